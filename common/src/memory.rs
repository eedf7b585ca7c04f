//! In-process collaborators. They back the UI when no hosted project is
//! configured and give tests an observable store.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::backend::{AuthBackend, BackendError, BlobStore, DocumentStore, ProfileUpdate, StoreQuery};
use crate::config::STORAGE_HOST;
use crate::listing::{Listing, ListingId, ListingPatch, NewListing};
use crate::session::Identity;
use crate::subscription::{lock, Fanout, Subscription};

#[derive(Default)]
struct StoreState {
    listings: BTreeMap<String, Listing>,
    seq: u64,
    last_created: Option<DateTime<Utc>>,
    failure: Option<BackendError>,
}

/// Mutating calls received, successful or not.
#[derive(Debug, Default)]
struct CallLog {
    inserts: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub inserts: usize,
    pub updates: usize,
    pub deletes: usize,
}

/// Listing store held in memory. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    feed: Fanout<StoreQuery, Vec<Listing>>,
    calls: Arc<CallLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `listings`, oldest first.
    pub fn seeded(listings: impl IntoIterator<Item = NewListing>) -> Self {
        let store = Self::new();
        {
            let mut state = lock(&store.state);
            for listing in listings {
                let (id, created) = state.next_key();
                state.listings.insert(id.0.clone(), listing.into_listing(id, created));
            }
        }
        store
    }

    /// Make every following call fail with `err` (`None` restores service).
    pub fn set_failure(&self, err: Option<BackendError>) {
        lock(&self.state).failure = err;
    }

    /// Insert a record as-is, bypassing id and timestamp assignment. Used to
    /// model documents written by other clients.
    pub fn put_raw(&self, listing: Listing) {
        lock(&self.state)
            .listings
            .insert(listing.id.0.clone(), listing);
        self.broadcast();
    }

    pub fn len(&self) -> usize {
        lock(&self.state).listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscriber_count(&self) -> usize {
        self.feed.len()
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            inserts: self.calls.inserts.load(Ordering::Relaxed),
            updates: self.calls.updates.load(Ordering::Relaxed),
            deletes: self.calls.deletes.load(Ordering::Relaxed),
        }
    }

    fn check(&self) -> Result<(), BackendError> {
        match &lock(&self.state).failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn snapshot(listings: &[Listing], query: &StoreQuery) -> Vec<Listing> {
        let mut matching: Vec<Listing> = listings
            .iter()
            .filter(|l| query.includes(l))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    fn broadcast(&self) {
        let all: Vec<Listing> = lock(&self.state).listings.values().cloned().collect();
        self.feed.publish(|query| Self::snapshot(&all, query));
    }
}

impl StoreState {
    /// Fresh id and a creation time strictly after the previous one.
    fn next_key(&mut self) -> (ListingId, DateTime<Utc>) {
        let mut created = Utc::now();
        if let Some(last) = self.last_created {
            if created <= last {
                created = last + Duration::milliseconds(1);
            }
        }
        self.last_created = Some(created);
        self.seq += 1;
        let id = format!("{:x}-{}", created.timestamp_millis(), self.seq);
        (ListingId(id), created)
    }
}

impl DocumentStore for MemoryStore {
    async fn insert(&self, listing: NewListing) -> Result<ListingId, BackendError> {
        self.calls.inserts.fetch_add(1, Ordering::Relaxed);
        self.check()?;
        let id = {
            let mut state = lock(&self.state);
            let (id, created) = state.next_key();
            state
                .listings
                .insert(id.0.clone(), listing.into_listing(id.clone(), created));
            id
        };
        tracing::debug!(%id, "memory store insert");
        self.broadcast();
        Ok(id)
    }

    async fn get(&self, id: &ListingId) -> Result<Option<Listing>, BackendError> {
        self.check()?;
        Ok(lock(&self.state).listings.get(&id.0).cloned())
    }

    async fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<(), BackendError> {
        self.calls.updates.fetch_add(1, Ordering::Relaxed);
        self.check()?;
        {
            let mut state = lock(&self.state);
            let listing = state
                .listings
                .get_mut(&id.0)
                .ok_or_else(|| BackendError::not_found(id))?;
            listing.apply_patch(&patch);
        }
        self.broadcast();
        Ok(())
    }

    async fn delete(&self, id: &ListingId) -> Result<(), BackendError> {
        self.calls.deletes.fetch_add(1, Ordering::Relaxed);
        self.check()?;
        let removed = lock(&self.state).listings.remove(&id.0).is_some();
        if removed {
            self.broadcast();
        }
        Ok(())
    }

    fn subscribe(&self, query: StoreQuery) -> Subscription<Vec<Listing>> {
        let all: Vec<Listing> = lock(&self.state).listings.values().cloned().collect();
        let initial = Self::snapshot(&all, &query);
        tracing::trace!(?query, size = initial.len(), "memory store subscribe");
        self.feed.subscribe(query, initial)
    }
}

#[derive(Default)]
struct BlobState {
    deleted: Vec<String>,
    failing: HashSet<String>,
}

/// Blob store that records deletions.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    state: Arc<Mutex<BlobState>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deletes of `path` fail.
    pub fn fail_on(&self, path: impl Into<String>) {
        lock(&self.state).failing.insert(path.into());
    }

    /// Paths deleted so far, in call order.
    pub fn deleted(&self) -> Vec<String> {
        lock(&self.state).deleted.clone()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn delete(&self, path: &str) -> Result<(), BackendError> {
        let mut state = lock(&self.state);
        if state.failing.contains(path) {
            return Err(BackendError::new(
                "storage/unauthorized",
                format!("cannot delete {path}"),
            ));
        }
        state.deleted.push(path.to_string());
        Ok(())
    }
}

/// Download URL the hosted blob store hands out for `path` in `bucket`.
pub fn hosted_url(bucket: &str, path: &str) -> String {
    format!(
        "https://{STORAGE_HOST}/v0/b/{bucket}/o/{}?alt=media",
        urlencoding::encode(path)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    PasswordReset,
    Verification,
}

/// A message the auth service would have sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub kind: MailKind,
}

struct Account {
    password: String,
    identity: Identity,
}

#[derive(Default)]
struct AuthState {
    accounts: BTreeMap<String, Account>,
    current: Option<Identity>,
    outbox: Vec<Mail>,
    next_uid: u64,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Email/password accounts plus a canned provider account.
#[derive(Clone, Default)]
pub struct MemoryAuth {
    state: Arc<Mutex<AuthState>>,
    feed: Fanout<(), Option<Identity>>,
}

impl MemoryAuth {
    pub const PROVIDER_EMAIL: &'static str = "demo@oldgold.app";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn outbox(&self) -> Vec<Mail> {
        lock(&self.state).outbox.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.feed.len()
    }

    fn set_current(&self, identity: Option<Identity>) {
        lock(&self.state).current = identity.clone();
        self.feed.publish(|_| identity.clone());
    }

    fn new_account(state: &mut AuthState, email: &str, password: &str, verified: bool) -> Identity {
        state.next_uid += 1;
        let identity = Identity {
            uid: format!("user-{}", state.next_uid),
            display_name: None,
            email: Some(email.to_string()),
            photo_url: None,
            email_verified: verified,
        };
        state.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        identity
    }

    fn signed_in(&self) -> Result<Identity, BackendError> {
        lock(&self.state)
            .current
            .clone()
            .ok_or_else(|| BackendError::new("auth/no-current-user", "No user is signed in."))
    }
}

fn normalize_email(email: &str) -> Result<String, BackendError> {
    let email = email.trim().to_lowercase();
    if email.contains('@') {
        Ok(email)
    } else {
        Err(BackendError::new("auth/invalid-email", "Firebase: Error (auth/invalid-email)."))
    }
}

impl AuthBackend for MemoryAuth {
    fn current_identity(&self) -> Option<Identity> {
        lock(&self.state).current.clone()
    }

    fn on_identity_changed(&self) -> Subscription<Option<Identity>> {
        self.feed.subscribe((), self.current_identity())
    }

    async fn sign_in_with_provider(&self) -> Result<Identity, BackendError> {
        let identity = {
            let mut state = lock(&self.state);
            match state.accounts.get(Self::PROVIDER_EMAIL) {
                Some(account) => account.identity.clone(),
                None => {
                    let mut identity =
                        Self::new_account(&mut state, Self::PROVIDER_EMAIL, "", true);
                    identity.display_name = Some("Demo Seller".into());
                    if let Some(account) = state.accounts.get_mut(Self::PROVIDER_EMAIL) {
                        account.identity = identity.clone();
                    }
                    identity
                }
            }
        };
        tracing::debug!(uid = %identity.uid, "provider sign-in");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_email_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, BackendError> {
        let email = normalize_email(email)?;
        let identity = {
            let state = lock(&self.state);
            match state.accounts.get(&email) {
                Some(account) if !account.password.is_empty() && account.password == password => {
                    account.identity.clone()
                }
                _ => {
                    return Err(BackendError::new(
                        "auth/invalid-credential",
                        "Firebase: Error (auth/invalid-credential).",
                    ))
                }
            }
        };
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, BackendError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BackendError::new(
                "auth/weak-password",
                "Firebase: Password should be at least 6 characters (auth/weak-password).",
            ));
        }
        let identity = {
            let mut state = lock(&self.state);
            if state.accounts.contains_key(&email) {
                return Err(BackendError::new(
                    "auth/email-already-in-use",
                    "Firebase: Error (auth/email-already-in-use).",
                ));
            }
            Self::new_account(&mut state, &email, password, false)
        };
        tracing::debug!(uid = %identity.uid, "account created");
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.set_current(None);
        Ok(())
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<Identity, BackendError> {
        let mut identity = self.signed_in()?;
        identity.display_name = update.display_name;
        identity.photo_url = update.photo_url;
        {
            let mut state = lock(&self.state);
            if let Some(account) = state
                .accounts
                .values_mut()
                .find(|a| a.identity.uid == identity.uid)
            {
                account.identity = identity.clone();
            }
        }
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), BackendError> {
        let email = normalize_email(email)?;
        let mut state = lock(&self.state);
        if !state.accounts.contains_key(&email) {
            return Err(BackendError::new(
                "auth/user-not-found",
                "Firebase: Error (auth/user-not-found).",
            ));
        }
        state.outbox.push(Mail {
            to: email,
            kind: MailKind::PasswordReset,
        });
        Ok(())
    }

    async fn send_email_verification(&self) -> Result<(), BackendError> {
        let identity = self.signed_in()?;
        let to = identity.email.unwrap_or_default();
        lock(&self.state).outbox.push(Mail {
            to,
            kind: MailKind::Verification,
        });
        Ok(())
    }
}

/// A handful of listings for the offline demo.
#[cfg(feature = "example-data")]
pub fn example_listings() -> Vec<NewListing> {
    use crate::listing::{Category, Condition};

    let make = |title: &str,
                price: f64,
                category: Category,
                condition: Condition,
                location: &str,
                image: &str| NewListing {
        title: title.into(),
        description: format!("{title}, well kept. Serious buyers only."),
        price,
        category,
        condition,
        location: location.into(),
        images: vec![image.into()],
        owner_id: crate::listing::GUEST_OWNER_ID.into(),
        seller_name: "Guest".into(),
        seller_contact: String::new(),
    };

    vec![
        make(
            "iPhone 12, 128GB",
            32000.0,
            Category::Mobiles,
            Condition::Used,
            "Mumbai",
            "https://images.unsplash.com/photo-1605236453806-6ff36851218e",
        ),
        make(
            "Maruti Swift VXI 2017",
            415000.0,
            Category::Cars,
            Condition::Used,
            "Pune",
            "https://images.unsplash.com/photo-1549317661-bd32c8ce0db2",
        ),
        make(
            "Royal Enfield Classic 350",
            95000.0,
            Category::Bikes,
            Condition::Used,
            "Jaipur",
            "https://images.unsplash.com/photo-1558981806-ec527fa84c39",
        ),
        make(
            "Three-seater sofa",
            12500.0,
            Category::Home,
            Condition::Used,
            "New Delhi",
            "https://images.unsplash.com/photo-1555041469-a586c61ea9bc",
        ),
        make(
            "Sony WH-1000XM4",
            18000.0,
            Category::Electronics,
            Condition::New,
            "Bengaluru",
            "https://images.unsplash.com/photo-1618366712010-f4ae9c647dcb",
        ),
    ]
}
