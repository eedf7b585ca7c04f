use dioxus::prelude::*;

use super::app::Route;

#[component]
pub fn NotFoundView() -> Element {
    rsx! {
        div { class: "page not-found",
            h2 { "Page not found" }
            p { "The page you were looking for doesn't exist." }
            Link { class: "btn", to: Route::Home {}, "Go home" }
        }
    }
}
