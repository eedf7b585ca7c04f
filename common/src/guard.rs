use crate::listing::{Listing, ListingId};
use crate::session::SessionState;

/// Client-side route surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Login,
    Signup,
    Create,
    Listing(ListingId),
    MyListings,
    Profile,
    Edit(ListingId),
    NotFound,
}

impl AppRoute {
    /// Match a location path. Query string and fragment are ignored.
    pub fn parse(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => AppRoute::Home,
            ["login"] => AppRoute::Login,
            ["signup"] => AppRoute::Signup,
            ["create"] => AppRoute::Create,
            ["listing", id] => AppRoute::Listing(ListingId::from(*id)),
            ["my-listings"] => AppRoute::MyListings,
            ["profile"] => AppRoute::Profile,
            ["edit", id] => AppRoute::Edit(ListingId::from(*id)),
            _ => AppRoute::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".into(),
            AppRoute::Login => "/login".into(),
            AppRoute::Signup => "/signup".into(),
            AppRoute::Create => "/create".into(),
            AppRoute::Listing(id) => format!("/listing/{id}"),
            AppRoute::MyListings => "/my-listings".into(),
            AppRoute::Profile => "/profile".into(),
            AppRoute::Edit(id) => format!("/edit/{id}"),
            AppRoute::NotFound => "/404".into(),
        }
    }

    /// Pages that need a signed-in identity.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            AppRoute::Create | AppRoute::MyListings | AppRoute::Profile | AppRoute::Edit(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Resolving,
    Authorized,
    Unauthorized,
}

impl GuardState {
    pub fn from_session(session: &SessionState) -> Self {
        match session {
            SessionState::Resolving => GuardState::Resolving,
            SessionState::SignedIn(_) => GuardState::Authorized,
            SessionState::SignedOut => GuardState::Unauthorized,
        }
    }
}

/// What a protected page should do for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Identity unknown: neutral placeholder, no navigation.
    Loading,
    Render,
    /// Replace the location with the login page.
    Redirect(String),
}

/// Evaluate the guard for `requested` (the full location being visited).
/// Call again on every session change.
pub fn evaluate(session: &SessionState, requested: &str) -> GuardOutcome {
    if !AppRoute::parse(requested).is_protected() {
        return GuardOutcome::Render;
    }
    match GuardState::from_session(session) {
        GuardState::Resolving => GuardOutcome::Loading,
        GuardState::Authorized => GuardOutcome::Render,
        GuardState::Unauthorized => {
            tracing::debug!(requested, "redirecting to login");
            GuardOutcome::Redirect(login_path(requested))
        }
    }
}

/// Login location that remembers where the visitor was heading.
pub fn login_path(from: &str) -> String {
    format!("/login?from={}", urlencoding::encode(from))
}

/// Where to go after a successful login. Only same-site paths are honoured,
/// and never the auth pages themselves.
pub fn return_destination(from: Option<&str>) -> String {
    let Some(raw) = from.map(str::trim).filter(|s| !s.is_empty()) else {
        return "/".into();
    };
    let decoded = urlencoding::decode(raw)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let same_site = decoded.starts_with('/') && !decoded.starts_with("//") && !decoded.contains('\\');
    let auth_page = matches!(AppRoute::parse(&decoded), AppRoute::Login | AppRoute::Signup);
    if same_site && !auth_page {
        decoded
    } else {
        "/".into()
    }
}

/// Edit/delete gate. Resolved before any mutating call is attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAccess {
    Loading,
    NotFound,
    NotAuthorized,
    Allowed(Listing),
}

impl EditAccess {
    /// `loaded` is `None` while the fetch is in flight, `Some(None)` when the
    /// listing does not exist.
    pub fn resolve(session: &SessionState, loaded: Option<Option<Listing>>) -> Self {
        if session.is_resolving() {
            return EditAccess::Loading;
        }
        match loaded {
            None => EditAccess::Loading,
            Some(None) => EditAccess::NotFound,
            Some(Some(listing)) => match session.identity() {
                Some(id) if listing.is_owned_by(&id.uid) => EditAccess::Allowed(listing),
                _ => EditAccess::NotAuthorized,
            },
        }
    }
}

/// True when the session may edit or delete `listing`.
pub fn can_edit(session: &SessionState, listing: &Listing) -> bool {
    session
        .identity()
        .is_some_and(|id| listing.is_owned_by(&id.uid))
}
