use dioxus::prelude::*;

use oldgold_common::format::{format_price_inr, time_ago};
use oldgold_common::listing::Listing;

use super::app::Route;

pub const IMAGE_FALLBACK: &str = "https://picsum.photos/800?blur=2";
pub const THUMB_FALLBACK: &str = "https://picsum.photos/200?blur=2";

#[component]
pub fn ListingCard(listing: Listing) -> Element {
    let cover = listing.cover_image().unwrap_or(THUMB_FALLBACK).to_string();
    let price = format_price_inr(listing.price);
    let age = time_ago(listing.created_at, chrono::Utc::now());

    rsx! {
        Link { class: "listing-card", to: Route::Listing { id: listing.id.to_string() },
            img { class: "lc-image", src: "{cover}", alt: "{listing.title}", loading: "lazy" }
            div { class: "lc-body",
                div { class: "lc-price", "{price}" }
                div { class: "lc-title", "{listing.title}" }
                div { class: "lc-meta",
                    span { "{listing.category}" }
                    span { " • {listing.location}" }
                }
                if !age.is_empty() {
                    div { class: "lc-time", "{age}" }
                }
            }
        }
    }
}
