use dioxus::prelude::*;

use oldgold_common::session::{Identity, SessionState};

/// State shared across all pages.
///
/// `session` is written only by the market coroutine, which mirrors the
/// session provider. Pages read it to decide what to show.
#[derive(Clone, Debug, Default)]
pub struct SharedState {
    pub session: SessionState,
    /// Last failure from a background action, shown as a banner.
    pub last_error: Option<String>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }
}

pub fn use_shared_state() -> Signal<SharedState> {
    use_context::<Signal<SharedState>>()
}
