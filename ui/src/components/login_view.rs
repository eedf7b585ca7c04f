use dioxus::prelude::*;

use oldgold_common::backend::{friendly_auth_message, AuthBackend, BackendError};
use oldgold_common::guard::return_destination;

use super::app::Route;
use super::market_api::use_market;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    fn heading(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Signup => "Create account",
        }
    }

    fn blurb(self) -> &'static str {
        match self {
            AuthMode::Login => "Welcome back! Login to continue.",
            AuthMode::Signup => "Create a new account to post and manage your listings.",
        }
    }

    fn busy_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Logging in…",
            AuthMode::Signup => "Creating…",
        }
    }
}

/// Email/password login or sign-up, plus provider sign-in. On success the
/// visitor goes back to where the guard found them.
#[component]
pub fn LoginView(mode: AuthMode, from: String) -> Element {
    let market = use_market();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let destination = return_destination(Some(&from));

    let finish = {
        let destination = destination.clone();
        move |result: Result<(), BackendError>| match result {
            Ok(()) => {
                tracing::debug!(%destination, "signed in, returning");
                nav.replace(Route::from_path(&destination));
            }
            Err(err) => {
                error.set(Some(friendly_auth_message(&err)));
                busy.set(false);
            }
        }
    };

    let submit = {
        let auth = market.auth.clone();
        let finish = finish.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if busy() {
                return;
            }
            busy.set(true);
            error.set(None);
            let (address, secret) = (email.read().clone(), password.read().clone());
            let auth = auth.clone();
            let mut finish = finish.clone();
            spawn(async move {
                let result = match mode {
                    AuthMode::Login => auth.sign_in_with_email_password(&address, &secret).await,
                    AuthMode::Signup => auth.create_account(&address, &secret).await,
                };
                finish(result.map(|_| ()));
            });
        }
    };

    let provider = {
        let auth = market.auth.clone();
        move |_| {
            if busy() {
                return;
            }
            busy.set(true);
            error.set(None);
            let auth = auth.clone();
            let mut finish = finish.clone();
            spawn(async move {
                let result = auth.sign_in_with_provider().await;
                finish(result.map(|_| ()));
            });
        }
    };

    let switch = match mode {
        AuthMode::Login => rsx! {
            p { class: "muted",
                "New here? "
                Link { to: Route::Signup { from: from.clone() }, "Create an account" }
            }
        },
        AuthMode::Signup => rsx! {
            p { class: "muted",
                "Already have an account? "
                Link { to: Route::Login { from: from.clone() }, "Login" }
            }
        },
    };

    let is_busy = busy();

    rsx! {
        div { class: "page auth-page",
            h1 { "{mode.heading()}" }
            p { class: "muted", "{mode.blurb()}" }
            if let Some(err) = error() {
                div { class: "alert alert-error", "{err}" }
            }
            form { class: "auth-form", onsubmit: submit,
                div { class: "form-group",
                    label { "Email" }
                    input {
                        r#type: "email",
                        placeholder: "you@example.com",
                        required: true,
                        autocomplete: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                div { class: "form-group",
                    label { "Password" }
                    input {
                        r#type: "password",
                        placeholder: "••••••••",
                        required: true,
                        autocomplete: if mode == AuthMode::Login { "current-password" } else { "new-password" },
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                button { class: "btn primary", r#type: "submit", disabled: is_busy,
                    if is_busy { "{mode.busy_label()}" } else { "{mode.heading()}" }
                }
            }
            div { class: "auth-alt",
                button { class: "btn", disabled: is_busy, onclick: provider, "Continue with Google" }
            }
            {switch}
        }
    }
}
