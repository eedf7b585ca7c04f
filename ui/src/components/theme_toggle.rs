use dioxus::prelude::*;

use oldgold_common::theme::{Theme, DARK_CLASS, THEME_KEY};

use super::dom;

/// Navbar dark-mode switch. The choice is saved; without one the platform
/// colour-scheme hint decides.
#[component]
pub fn ThemeToggle() -> Element {
    let mut theme = use_signal(|| Theme::resolve(dom::load_item(THEME_KEY).as_deref(), dom::prefers_dark()));

    use_effect(move || {
        let current = theme();
        dom::set_root_class(DARK_CLASS, current.is_dark());
        dom::save_item(THEME_KEY, current.as_str());
    });

    let label = if theme().is_dark() { "☀️" } else { "🌙" };
    let title = if theme().is_dark() { "Switch to light mode" } else { "Switch to dark mode" };

    rsx! {
        button {
            class: "theme-toggle",
            title: "{title}",
            aria_label: "{title}",
            onclick: move |_| {
                let next = theme().toggle();
                theme.set(next);
            },
            "{label}"
        }
    }
}
