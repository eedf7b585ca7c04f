use std::time::Duration;

use futures::StreamExt;

use oldgold_common::draft::ListingDraft;
use oldgold_common::listing::{Category, Condition, Listing};
use oldgold_common::session::Identity;
use oldgold_common::subscription::Subscription;

pub mod harness;

pub const TIMEOUT: Duration = Duration::from_secs(2);

/// Bucket the harness configures for store-hosted images.
pub const BUCKET: &str = "oldgold-test.appspot.com";

/// Create a verified identity with a display name.
pub fn make_identity(uid: &str, name: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        display_name: Some(name.to_string()),
        email: Some(format!("{uid}@example.com")),
        photo_url: None,
        email_verified: true,
    }
}

/// Create a form draft that passes validation.
pub fn make_draft(title: &str, price: &str, location: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: format!("{title}, barely used"),
        price: price.to_string(),
        category: Category::Electronics,
        condition: Condition::Used,
        location: location.to_string(),
        image_urls: format!("https://i.ibb.co/{}.jpg", title.to_lowercase().replace(' ', "-")),
        seller_name: String::new(),
        seller_contact: "9876543210".to_string(),
    }
}

/// Wait for the next pushed value, with timeout.
pub async fn next_within<T>(sub: &mut Subscription<T>, timeout: Duration) -> Option<T> {
    tokio::time::timeout(timeout, sub.next()).await.ok().flatten()
}

/// Drain values already pushed and return the most recent one.
pub fn latest<T>(sub: &mut Subscription<T>) -> Option<T> {
    let mut last = None;
    while let Some(value) = sub.try_next_now() {
        last = Some(value);
    }
    last
}

pub fn titles(listings: &[Listing]) -> Vec<String> {
    listings.iter().map(|l| l.title.clone()).collect()
}
