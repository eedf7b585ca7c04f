use dioxus::prelude::*;

use oldgold_common::draft::ListingDraft;
use oldgold_common::guard::EditAccess;
use oldgold_common::listing::ListingId;

use super::app::Route;
use super::listing_form::ListingForm;
use super::market_api::use_market;
use super::shared_state::use_shared_state;

/// Owner-only edit page. Mount with `key` set to the id so a new id loads
/// afresh.
#[component]
pub fn EditListing(id: String) -> Element {
    let market = use_market();
    let shared = use_shared_state();
    let nav = use_navigator();
    let listing_id = ListingId(id);

    let mut draft = use_signal(ListingDraft::default);
    let mut prefilled = use_signal(|| false);
    let mut pending = use_signal(|| false);
    let mut saved = use_signal(|| false);
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

    use_effect(move || {
        if let Some(Ok(Some(listing))) = &*loaded.read() {
            if !*prefilled.peek() {
                draft.set(ListingDraft::from_listing(listing));
                prefilled.set(true);
            }
        }
    });

    let fetched = match &*loaded.read() {
        None => None,
        Some(Ok(found)) => Some(found.clone()),
        Some(Err(err)) => {
            return rsx! {
                div { class: "page",
                    div { class: "alert alert-error", "Could not load listing: {err}" }
                }
            };
        }
    };

    let access = EditAccess::resolve(&shared.read().session, fetched);
    let listing = match access {
        EditAccess::Loading => {
            return rsx! { div { class: "page-loading", "Loading…" } };
        }
        EditAccess::NotFound => {
            return rsx! {
                div { class: "page",
                    h2 { "Listing not found" }
                    Link { to: Route::Home {}, "Back to listings" }
                }
            };
        }
        EditAccess::NotAuthorized => {
            return rsx! {
                div { class: "page",
                    h2 { "Not authorized" }
                    p { "You can only edit your own listings." }
                    Link { to: Route::Listing { id: listing_id.to_string() }, "View listing" }
                }
            };
        }
        EditAccess::Allowed(listing) => listing,
    };

    let submit = move |_| {
        if pending() {
            return;
        }
        let Some(who) = shared.read().identity().cloned() else {
            return;
        };
        if let Err(err) = draft.read().validate() {
            error.set(Some(err.to_string()));
            return;
        }
        error.set(None);
        pending.set(true);

        let form = draft.read().clone();
        let gateway = market.gateway.clone();
        let id = listing.id.clone();
        spawn(async move {
            match gateway.save_draft(&who, &id, &form).await {
                Ok(()) => {
                    saved.set(true);
                    #[cfg(target_family = "wasm")]
                    gloo_timers::future::TimeoutFuture::new(500).await;
                    nav.replace(Route::Listing { id: id.to_string() });
                }
                Err(err) => {
                    tracing::warn!(%err, %id, "save listing failed");
                    error.set(Some(err.to_string()));
                    pending.set(false);
                }
            }
        });
    };

    rsx! {
        div { class: "page edit-listing",
            h2 { "Edit listing" }
            if saved() {
                div { class: "alert alert-success", "Saved!" }
            }
            if prefilled() {
                ListingForm {
                    draft,
                    pending: pending(),
                    error: error(),
                    submit_label: if pending() { "Saving…".to_string() } else { "Save changes".to_string() },
                    on_submit: submit,
                }
            }
        }
    }
}
