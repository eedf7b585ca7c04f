use dioxus::prelude::*;

use oldgold_common::backend::{friendly_auth_message, AuthBackend, ProfileUpdate};

use super::app::Route;
use super::dom;
use super::market_api::{use_market, use_market_action, MarketAction};
use super::shared_state::use_shared_state;

const AVATAR_FALLBACK: &str =
    "https://ui-avatars.com/api/?name=User&background=111111&color=ffffff&size=160&bold=true";

#[derive(Clone, Debug, PartialEq)]
enum Notice {
    Ok(String),
    Error(String),
}

#[component]
pub fn ProfileView() -> Element {
    let market = use_market();
    let actions = use_market_action();
    let shared = use_shared_state();
    let nav = use_navigator();

    let initial = shared.read().identity().cloned();
    let mut display_name = use_signal(|| {
        initial
            .as_ref()
            .and_then(|id| id.display_name.clone())
            .unwrap_or_default()
    });
    let mut photo_url = use_signal(|| {
        initial
            .as_ref()
            .and_then(|id| id.photo_url.clone())
            .unwrap_or_default()
    });
    let mut busy = use_signal(|| false);
    let mut notice = use_signal(|| None::<Notice>);

    let Some(identity) = shared.read().identity().cloned() else {
        return rsx! {};
    };

    let save = {
        let auth = market.auth.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if busy() {
                return;
            }
            busy.set(true);
            notice.set(None);
            let update = ProfileUpdate::from_inputs(&display_name.read(), &photo_url.read());
            let auth = auth.clone();
            spawn(async move {
                match auth.update_profile(update).await {
                    Ok(_) => notice.set(Some(Notice::Ok("Profile updated.".into()))),
                    Err(err) => notice.set(Some(Notice::Error(friendly_auth_message(&err)))),
                }
                busy.set(false);
            });
        }
    };

    let reset_password = {
        let auth = market.auth.clone();
        let email = identity.email.clone();
        move |_| {
            let Some(email) = email.clone() else {
                notice.set(Some(Notice::Error("No email on this account.".into())));
                return;
            };
            busy.set(true);
            notice.set(None);
            let auth = auth.clone();
            spawn(async move {
                match auth.send_password_reset(&email).await {
                    Ok(()) => notice.set(Some(Notice::Ok("Password reset email sent.".into()))),
                    Err(err) => notice.set(Some(Notice::Error(friendly_auth_message(&err)))),
                }
                busy.set(false);
            });
        }
    };

    let verify_email = {
        let auth = market.auth.clone();
        move |_| {
            busy.set(true);
            notice.set(None);
            let auth = auth.clone();
            spawn(async move {
                match auth.send_email_verification().await {
                    Ok(()) => notice.set(Some(Notice::Ok("Verification email sent.".into()))),
                    Err(err) => notice.set(Some(Notice::Error(friendly_auth_message(&err)))),
                }
                busy.set(false);
            });
        }
    };

    let logout = move |_| {
        if dom::confirm("Logout now?") {
            actions.send(MarketAction::SignOut);
            nav.push(Route::Home {});
        }
    };

    let avatar = match identity.photo_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => AVATAR_FALLBACK.to_string(),
    };
    let preview = {
        let typed = photo_url.read().trim().to_string();
        if typed.is_empty() {
            AVATAR_FALLBACK.to_string()
        } else {
            typed
        }
    };
    let email = identity.email.clone().unwrap_or_else(|| "—".into());
    let verified = identity.email_verified;
    let is_busy = busy();

    rsx! {
        div { class: "page profile-wrap",
            div { class: "profile-card",
                header { class: "profile-top",
                    div { class: "avatar-wrap",
                        img { class: "profile-avatar", src: "{avatar}", alt: "avatar" }
                        div {
                            class: if verified { "status-dot ok" } else { "status-dot warn" },
                            title: if verified { "Email verified" } else { "Email not verified" },
                        }
                    }
                    div { class: "profile-id",
                        div { class: "profile-name", "{identity.shown_name()}" }
                        div { class: "profile-email", "{email}" }
                        div { class: "profile-meta",
                            if verified {
                                span { class: "ok", "Email verified" }
                            } else {
                                span { class: "warn", "Email not verified" }
                            }
                            span { class: "muted", "UID: {identity.uid}" }
                        }
                        div { class: "quick-row",
                            Link { class: "btn primary", to: Route::Create {}, "Post Ad" }
                            Link { class: "btn", to: Route::MyListings {}, "My Listings" }
                        }
                    }
                }

                {
                    match notice() {
                        Some(Notice::Ok(msg)) => rsx! { div { class: "alert alert-success", "{msg}" } },
                        Some(Notice::Error(msg)) => rsx! { div { class: "alert alert-error", "{msg}" } },
                        None => rsx! {},
                    }
                }

                form { class: "profile-form", onsubmit: save,
                    div { class: "form-group",
                        label { "Display Name" }
                        input {
                            placeholder: "Your name",
                            value: "{display_name}",
                            oninput: move |evt| display_name.set(evt.value()),
                        }
                    }
                    div { class: "form-group",
                        label { "Photo URL (direct link)" }
                        input {
                            placeholder: "https://…/avatar.png",
                            value: "{photo_url}",
                            oninput: move |evt| photo_url.set(evt.value()),
                        }
                    }
                    div { class: "preview",
                        img { src: "{preview}", alt: "preview" }
                    }
                    button { r#type: "submit", disabled: is_busy, "Save profile" }
                }

                div { class: "profile-actions",
                    button { class: "btn", disabled: is_busy, onclick: reset_password, "Send password reset" }
                    if !verified {
                        button { class: "btn", disabled: is_busy, onclick: verify_email, "Verify email" }
                    }
                    button { class: "btn danger", onclick: logout, "Logout" }
                }
            }
        }
    }
}
