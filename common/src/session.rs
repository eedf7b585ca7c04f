use std::sync::{Arc, Mutex};

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::backend::AuthBackend;
use crate::listing::GUEST_OWNER_ID;
use crate::subscription::{lock, Fanout, Subscription};

/// The signed-in account as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
}

impl Identity {
    /// Name shown in the navbar and used as the default seller name.
    pub fn shown_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("User")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Auth has not reported yet.
    #[default]
    Resolving,
    SignedIn(Identity),
    SignedOut,
}

impl SessionState {
    pub fn from_identity(identity: Option<Identity>) -> Self {
        match identity {
            Some(id) => SessionState::SignedIn(id),
            None => SessionState::SignedOut,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::SignedIn(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, SessionState::Resolving)
    }
}

/// Who a new listing is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub uid: String,
    pub display_name: String,
}

impl Owner {
    pub fn guest() -> Self {
        Self {
            uid: GUEST_OWNER_ID.to_string(),
            display_name: "Guest".to_string(),
        }
    }

    pub fn from_session(identity: Option<&Identity>) -> Self {
        match identity {
            Some(id) => Self {
                uid: id.uid.clone(),
                display_name: id
                    .display_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or("Guest")
                    .to_string(),
            },
            None => Self::guest(),
        }
    }
}

/// Process-wide session value. Pages observe it through [`watch`]; only auth
/// events move it, via [`apply`] or [`follow`].
///
/// [`watch`]: SessionProvider::watch
/// [`apply`]: SessionProvider::apply
/// [`follow`]: SessionProvider::follow
#[derive(Clone, Default)]
pub struct SessionProvider {
    state: Arc<Mutex<SessionState>>,
    watchers: Fanout<(), SessionState>,
}

impl SessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SessionState {
        lock(&self.state).clone()
    }

    /// Observe the session, starting with its current value.
    pub fn watch(&self) -> Subscription<SessionState> {
        let current = self.current();
        self.watchers.subscribe((), current)
    }

    /// Record an identity-changed event from the auth collaborator.
    pub fn apply(&self, identity: Option<Identity>) {
        let next = SessionState::from_identity(identity);
        {
            let mut state = lock(&self.state);
            if *state == next {
                return;
            }
            *state = next.clone();
        }
        match &next {
            SessionState::SignedIn(id) => tracing::info!(uid = %id.uid, "session signed in"),
            _ => tracing::info!("session signed out"),
        }
        self.watchers.publish(|_| next.clone());
    }

    /// Drive the session from the collaborator's identity stream until that
    /// stream ends.
    pub async fn follow<A: AuthBackend>(&self, auth: &A) {
        let mut changes = auth.on_identity_changed();
        while let Some(identity) = changes.next().await {
            self.apply(identity);
        }
        tracing::debug!("identity stream closed");
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            uid: "alice".into(),
            display_name: Some("Alice".into()),
            email: Some("alice@example.com".into()),
            photo_url: None,
            email_verified: false,
        }
    }

    #[test]
    fn test_starts_resolving() {
        let provider = SessionProvider::new();
        assert!(provider.current().is_resolving());
    }

    #[test]
    fn test_watchers_see_changes_once() {
        let provider = SessionProvider::new();
        let mut watch = provider.watch();
        assert_eq!(watch.try_next_now(), Some(SessionState::Resolving));

        provider.apply(Some(alice()));
        provider.apply(Some(alice()));
        provider.apply(None);

        assert_eq!(watch.try_next_now(), Some(SessionState::SignedIn(alice())));
        assert_eq!(watch.try_next_now(), Some(SessionState::SignedOut));
        assert_eq!(watch.try_next_now(), None);

        drop(watch);
        assert_eq!(provider.watcher_count(), 0);
    }

    #[test]
    fn test_owner_falls_back_to_guest() {
        assert_eq!(Owner::from_session(None).uid, "guest");
        let owner = Owner::from_session(Some(&alice()));
        assert_eq!(owner.uid, "alice");
        assert_eq!(owner.display_name, "Alice");
        assert_eq!(alice().shown_name(), "Alice");
    }

    #[test]
    fn test_blank_display_name_is_guest() {
        let mut nameless = alice();
        nameless.display_name = Some("  ".into());
        let owner = Owner::from_session(Some(&nameless));
        assert_eq!(owner.uid, "alice");
        assert_eq!(owner.display_name, "Guest");
    }
}
