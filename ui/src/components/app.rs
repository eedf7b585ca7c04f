use dioxus::prelude::*;

use oldgold_common::guard::{evaluate, GuardOutcome};

use super::create_listing::CreateListing;
use super::edit_listing::EditListing;
use super::home_view::HomeView;
use super::listing_details::ListingDetails;
use super::login_view::{AuthMode, LoginView};
use super::market_api::{use_market_action, use_market_coroutine, Market, MarketAction};
use super::my_listings::MyListingsView;
use super::not_found::NotFoundView;
use super::profile_view::ProfileView;
use super::shared_state::{use_shared_state, SharedState};
use super::theme_toggle::ThemeToggle;

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/login?:from")]
    Login { from: String },
    #[route("/signup?:from")]
    Signup { from: String },
    #[route("/create")]
    Create {},
    #[route("/listing/:id")]
    Listing { id: String },
    #[route("/my-listings")]
    MyListings {},
    #[route("/profile")]
    Profile {},
    #[route("/edit/:id")]
    Edit { id: String },
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    /// Resolve an in-app path, falling back to the home page.
    pub fn from_path(path: &str) -> Self {
        path.parse().unwrap_or(Route::Home {})
    }
}

#[component]
pub fn App() -> Element {
    use_context_provider(Market::connect);
    use_context_provider(|| Signal::new(SharedState::new()));
    use_market_coroutine();

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }
        Router::<Route> {}
    }
}

#[component]
fn AppLayout() -> Element {
    let mut shared = use_shared_state();
    let market = use_market_action();
    let nav = use_navigator();

    let state = shared.read();
    let identity = state.identity().cloned();
    let resolving = state.session.is_resolving();
    let last_error = state.last_error.clone();
    drop(state);

    rsx! {
        div { class: "oldgold-app",
            header { class: "navbar",
                Link { class: "brand", to: Route::Home {}, "OldGold" }
                nav { class: "nav-links",
                    Link { to: Route::Home {}, "Browse" }
                    Link { class: "sell-btn", to: Route::Create {}, "Sell" }
                    if let Some(identity) = identity {
                        Link { to: Route::MyListings {}, "My Listings" }
                        Link { class: "nav-user", to: Route::Profile {}, "{identity.shown_name()}" }
                        button {
                            class: "link-btn",
                            onclick: move |_| {
                                market.send(MarketAction::SignOut);
                                nav.push(Route::Home {});
                            },
                            "Logout"
                        }
                    } else if !resolving {
                        Link { to: Route::Login { from: String::new() }, "Login" }
                        Link { to: Route::Signup { from: String::new() }, "Sign up" }
                    }
                    ThemeToggle {}
                }
            }
            if let Some(err) = last_error {
                div { class: "alert alert-error",
                    span { "{err}" }
                    button {
                        class: "link-btn",
                        onclick: move |_| shared.write().last_error = None,
                        "Dismiss"
                    }
                }
            }
            main {
                Outlet::<Route> {}
            }
        }
    }
}

/// Renders `children` only for a signed-in visitor. Visitors who are signed
/// out are sent to the login page, which returns them here afterwards.
#[component]
fn RequireAuth(children: Element) -> Element {
    let shared = use_shared_state();
    let route = use_route::<Route>();
    let nav = use_navigator();

    let requested = route.to_string();
    let outcome = evaluate(&shared.read().session, &requested);
    match outcome {
        GuardOutcome::Loading => rsx! {
            div { class: "page-loading", "Loading…" }
        },
        GuardOutcome::Render => children,
        GuardOutcome::Redirect(_) => {
            nav.replace(Route::Login { from: requested });
            rsx! {}
        }
    }
}

#[component]
fn Home() -> Element {
    rsx! { HomeView {} }
}

#[component]
fn Login(from: String) -> Element {
    rsx! { LoginView { mode: AuthMode::Login, from } }
}

#[component]
fn Signup(from: String) -> Element {
    rsx! { LoginView { mode: AuthMode::Signup, from } }
}

#[component]
fn Create() -> Element {
    rsx! {
        RequireAuth { CreateListing {} }
    }
}

/// Route component: a listing's detail page, public.
#[component]
fn Listing(id: String) -> Element {
    rsx! { ListingDetails { key: "{id}", id: id.clone() } }
}

#[component]
fn MyListings() -> Element {
    rsx! {
        RequireAuth { MyListingsView {} }
    }
}

#[component]
fn Profile() -> Element {
    rsx! {
        RequireAuth { ProfileView {} }
    }
}

#[component]
fn Edit(id: String) -> Element {
    rsx! {
        RequireAuth {
            EditListing { key: "{id}", id: id.clone() }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    tracing::debug!(path = %segments.join("/"), "no route matched");
    rsx! { NotFoundView {} }
}
