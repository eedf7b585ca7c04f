//! Contracts of the hosted collaborators: authentication, the listing
//! document store and blob storage. Implementations live outside this
//! module; [`crate::memory`] provides in-process ones.

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, ListingId, ListingPatch, NewListing};
use crate::session::Identity;
use crate::subscription::Subscription;

/// A failed collaborator call, with the provider's error code when known
/// (e.g. `auth/invalid-credential`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct BackendError {
    pub code: String,
    pub message: String,
}

impl BackendError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::new("not-found", format!("No document to update: {what}"))
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new("unavailable", message)
    }
}

/// Turn auth failures into something a visitor can act on. Unknown errors
/// pass through with the vendor prefix stripped.
pub fn friendly_auth_message(err: &BackendError) -> String {
    let haystack = format!("{} {}", err.code, err.message).to_lowercase();
    if haystack.contains("invalid-credential") {
        return "Incorrect email or password.".into();
    }
    if haystack.contains("email-already-in-use") {
        return "This email is already in use. Try logging in.".into();
    }
    if haystack.contains("weak-password") {
        return "Password should be at least 6 characters.".into();
    }
    if haystack.contains("network") || haystack.contains("timeout") {
        return "Network error. Please check your connection.".into();
    }
    if haystack.contains("popup-blocked") || haystack.contains("popup_closed_by_user") {
        return "Popup blocked or closed. Try again or use a different device.".into();
    }
    err.message.replace("Firebase:", "").trim().to_string()
}

/// Profile fields the account holder may change. `None` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    /// Blank inputs clear the field rather than storing whitespace.
    pub fn from_inputs(display_name: &str, photo_url: &str) -> Self {
        let clean = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            display_name: clean(display_name),
            photo_url: clean(photo_url),
        }
    }
}

/// Authentication collaborator.
#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    fn current_identity(&self) -> Option<Identity>;

    /// Identity changes, starting with the current identity.
    fn on_identity_changed(&self) -> Subscription<Option<Identity>>;

    /// Federated sign-in (the hosted provider's popup/redirect flow).
    async fn sign_in_with_provider(&self) -> Result<Identity, BackendError>;

    async fn sign_in_with_email_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, BackendError>;

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    async fn update_profile(&self, update: ProfileUpdate) -> Result<Identity, BackendError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), BackendError>;

    async fn send_email_verification(&self) -> Result<(), BackendError>;
}

/// Live query shapes the store supports. Both order by `created_at`
/// descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreQuery {
    Latest,
    ByOwner(String),
}

impl StoreQuery {
    pub fn includes(&self, listing: &Listing) -> bool {
        match self {
            StoreQuery::Latest => true,
            StoreQuery::ByOwner(uid) => listing.owner_id == *uid,
        }
    }
}

/// Listing document store.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Insert with a server-assigned id and timestamp.
    async fn insert(&self, listing: NewListing) -> Result<ListingId, BackendError>;

    async fn get(&self, id: &ListingId) -> Result<Option<Listing>, BackendError>;

    /// Fails with `not-found` when the document does not exist.
    async fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<(), BackendError>;

    async fn delete(&self, id: &ListingId) -> Result<(), BackendError>;

    /// Full matching set now and after every change, until dropped.
    fn subscribe(&self, query: StoreQuery) -> Subscription<Vec<Listing>>;
}

/// Object storage for listing images.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn delete(&self, path: &str) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_auth_codes_are_friendly() {
        let cases = [
            ("auth/invalid-credential", "Incorrect email or password."),
            ("auth/email-already-in-use", "This email is already in use. Try logging in."),
            ("auth/weak-password", "Password should be at least 6 characters."),
            ("auth/network-request-failed", "Network error. Please check your connection."),
            ("auth/popup-blocked", "Popup blocked or closed. Try again or use a different device."),
        ];
        for (code, expected) in cases {
            let err = BackendError::new(code, "Firebase: Error (something).");
            assert_eq!(friendly_auth_message(&err), expected, "{code}");
        }
    }

    #[test]
    fn test_unknown_errors_pass_through() {
        let err = BackendError::new("auth/user-disabled", "Firebase: This account is disabled.");
        assert_eq!(friendly_auth_message(&err), "This account is disabled.");
    }

    #[test]
    fn test_profile_update_clears_blank_fields() {
        let update = ProfileUpdate::from_inputs("  Meera ", "   ");
        assert_eq!(update.display_name.as_deref(), Some("Meera"));
        assert_eq!(update.photo_url, None);
    }
}
