use dioxus::prelude::*;
use futures::StreamExt;

use oldgold_common::listing::Listing;

use super::app::Route;
use super::listing_card::ListingCard;
use super::market_api::use_market;
use super::shared_state::use_shared_state;

#[component]
pub fn MyListingsView() -> Element {
    let shared = use_shared_state();
    let uid = shared.read().identity().map(|id| id.uid.clone());

    rsx! {
        div { class: "page my-listings",
            h2 { "My Listings" }
            if let Some(uid) = uid {
                OwnerFeed { key: "{uid}", uid: uid.clone() }
            }
        }
    }
}

/// Live list of one owner's listings, newest first.
#[component]
fn OwnerFeed(uid: String) -> Element {
    let market = use_market();
    let mut listings = use_signal(|| None::<Vec<Listing>>);

    use_future(move || {
        let gateway = market.gateway.clone();
        let uid = uid.clone();
        async move {
            let mut feed = gateway.subscribe_by_owner(&uid);
            while let Some(snapshot) = feed.next().await {
                listings.set(Some(snapshot));
            }
        }
    });

    match &*listings.read() {
        None => rsx! { p { class: "page-loading", "Loading…" } },
        Some(items) if items.is_empty() => rsx! {
            div { class: "empty-state",
                p { "You haven't posted anything yet." }
                Link { class: "sell-btn", to: Route::Create {}, "Post your first ad" }
            }
        },
        Some(items) => rsx! {
            div { class: "listing-grid",
                for listing in items.iter() {
                    ListingCard { key: "{listing.id}", listing: listing.clone() }
                }
            }
        },
    }
}
