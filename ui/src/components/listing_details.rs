use dioxus::prelude::*;

use oldgold_common::format::{format_price_inr, interest_message, time_ago, whatsapp_link};
use oldgold_common::guard::can_edit;
use oldgold_common::listing::ListingId;

use super::app::Route;
use super::dom;
use super::listing_card::{IMAGE_FALLBACK, THUMB_FALLBACK};
use super::market_api::use_market;
use super::shared_state::use_shared_state;

#[component]
pub fn ListingDetails(id: String) -> Element {
    let market = use_market();
    let shared = use_shared_state();
    let nav = use_navigator();
    let listing_id = ListingId(id);

    let mut selected = use_signal(|| 0usize);
    let mut deleting = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let loaded = use_resource({
        let gateway = market.gateway.clone();
        let listing_id = listing_id.clone();
        move || {
            let gateway = gateway.clone();
            let listing_id = listing_id.clone();
            async move { gateway.get(&listing_id).await }
        }
    });

    let listing = match &*loaded.read() {
        None => return rsx! { div { class: "page-loading", "Loading…" } },
        Some(Err(err)) => {
            return rsx! {
                div { class: "page",
                    div { class: "alert alert-error", "Could not load listing: {err}" }
                }
            };
        }
        Some(Ok(None)) => {
            return rsx! {
                div { class: "page",
                    h2 { "Listing not found" }
                    Link { to: Route::Home {}, "Back to listings" }
                }
            };
        }
        Some(Ok(Some(listing))) => listing.clone(),
    };

    let is_owner = can_edit(&shared.read().session, &listing);
    let images = listing.images.clone();
    let main_image = images
        .get(selected())
        .or(images.first())
        .cloned()
        .unwrap_or_else(|| IMAGE_FALLBACK.to_string());
    let price = format_price_inr(listing.price);
    let posted = time_ago(listing.created_at, chrono::Utc::now());
    let seller = if listing.seller_name.trim().is_empty() {
        "Seller".to_string()
    } else {
        listing.seller_name.clone()
    };
    let whatsapp = whatsapp_link(&listing.seller_contact, &interest_message(&listing.title));

    let delete = {
        let listing = listing.clone();
        move |_| {
            if deleting() {
                return;
            }
            let Some(who) = shared.read().identity().cloned() else {
                return;
            };
            if !dom::confirm("Delete this listing? This cannot be undone.") {
                return;
            }
            deleting.set(true);
            let gateway = market.gateway.clone();
            let id = listing.id.clone();
            spawn(async move {
                match gateway.delete_as(&who, &id).await {
                    Ok(()) => {
                        nav.replace(Route::Home {});
                    }
                    Err(err) => {
                        tracing::warn!(%err, %id, "delete listing failed");
                        error.set(Some(err.to_string()));
                        deleting.set(false);
                    }
                }
            });
        }
    };

    rsx! {
        div { class: "page listing-details",
            Link { class: "btn back-btn", to: Route::Home {}, "← Back" }
            div { class: "gallery",
                img { class: "gallery-main", src: "{main_image}", alt: "{listing.title}" }
                if images.len() > 1 {
                    div { class: "gallery-thumbs",
                        for (index, url) in images.iter().enumerate() {
                            button {
                                key: "{index}",
                                class: if index == selected() { "thumb active" } else { "thumb" },
                                onclick: move |_| selected.set(index),
                                img { src: "{url}", alt: "thumbnail {index}" }
                            }
                        }
                    }
                } else if images.is_empty() {
                    img { class: "gallery-thumb-fallback", src: THUMB_FALLBACK, alt: "no image" }
                }
            }
            div { class: "details",
                h2 { "{listing.title}" }
                div { class: "price", "{price}" }
                div { class: "meta",
                    span { class: "badge", "{listing.category}" }
                    span { class: "badge", "{listing.condition}" }
                    span { "{listing.location}" }
                    if !posted.is_empty() {
                        span { class: "posted", "Posted {posted}" }
                    }
                }
                if !listing.description.is_empty() {
                    p { class: "description", "{listing.description}" }
                }
                div { class: "seller",
                    h3 { "Seller" }
                    p { "{seller}" }
                    if let Some(link) = whatsapp {
                        a {
                            class: "whatsapp-btn",
                            href: "{link}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            "Chat on WhatsApp"
                        }
                    }
                }
                if is_owner {
                    div { class: "owner-actions",
                        Link { class: "edit-btn", to: Route::Edit { id: listing.id.to_string() }, "Edit" }
                        button {
                            class: "delete-btn",
                            disabled: deleting(),
                            onclick: delete,
                            if deleting() { "Deleting…" } else { "Delete" }
                        }
                    }
                }
                if let Some(err) = error() {
                    div { class: "alert alert-error", "{err}" }
                }
            }
        }
    }
}
