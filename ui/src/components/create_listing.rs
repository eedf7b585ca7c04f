use dioxus::prelude::*;

use oldgold_common::draft::ListingDraft;
use oldgold_common::session::Owner;

use super::app::Route;
use super::listing_form::ListingForm;
use super::market_api::use_market;
use super::shared_state::use_shared_state;

#[component]
pub fn CreateListing() -> Element {
    let market = use_market();
    let shared = use_shared_state();
    let nav = use_navigator();
    let draft = use_signal(ListingDraft::default);
    let mut pending = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let submit = move |_| {
        if pending() {
            return;
        }
        if let Err(err) = draft.read().validate() {
            error.set(Some(err.to_string()));
            return;
        }
        error.set(None);
        pending.set(true);

        let owner = Owner::from_session(shared.read().identity());
        let form = draft.read().clone();
        let gateway = market.gateway.clone();
        spawn(async move {
            match gateway.create(&owner, &form).await {
                Ok(id) => {
                    nav.replace(Route::Listing { id: id.to_string() });
                }
                Err(err) => {
                    tracing::warn!(%err, "create listing failed");
                    error.set(Some(err.to_string()));
                    pending.set(false);
                }
            }
        });
    };

    rsx! {
        div { class: "page create-listing",
            h2 { "Post an ad" }
            ListingForm {
                draft,
                pending: pending(),
                error: error(),
                submit_label: if pending() { "Posting…".to_string() } else { "Post listing".to_string() },
                on_submit: submit,
            }
        }
    }
}
