//! Thin browser helpers. Off the web they fall back to harmless defaults.

/// Ask the visitor to confirm a destructive action.
pub fn confirm(message: &str) -> bool {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(target_family = "wasm"))]
    {
        tracing::debug!(message, "confirm (non-web): accepted");
        true
    }
}

pub fn load_item(key: &str) -> Option<String> {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()?
            .local_storage()
            .ok()??
            .get_item(key)
            .ok()?
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = key;
        None
    }
}

pub fn save_item(key: &str, value: &str) {
    #[cfg(target_family = "wasm")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        match storage {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::warn!(key, "localStorage write failed");
                }
            }
            None => tracing::warn!("localStorage unavailable"),
        }
    }
    #[cfg(not(target_family = "wasm"))]
    {
        tracing::debug!(key, value, "save_item (non-web): ignored");
    }
}

/// Whether the platform asks for a dark colour scheme.
pub fn prefers_dark() -> bool {
    #[cfg(target_family = "wasm")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map(|query| query.matches())
            .unwrap_or(false)
    }
    #[cfg(not(target_family = "wasm"))]
    {
        false
    }
}

/// Add or remove `class` on the document root element.
pub fn set_root_class(class: &str, on: bool) {
    #[cfg(target_family = "wasm")]
    {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element());
        if let Some(root) = root {
            if root.class_list().toggle_with_force(class, on).is_err() {
                tracing::warn!(class, "could not toggle root class");
            }
        }
    }
    #[cfg(not(target_family = "wasm"))]
    {
        let _ = (class, on);
    }
}
