use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures::StreamExt;

use oldgold_common::listing::{Category, Condition, Listing};
use oldgold_common::query::{CategoryFilter, ConditionFilter, Criteria, QueryMemo, SortMode};

use super::listing_card::ListingCard;
use super::market_api::use_market;

/// Marketplace front page: live listings narrowed by the visitor's criteria.
#[component]
pub fn HomeView() -> Element {
    let market = use_market();
    let mut listings = use_signal(Vec::<Listing>::new);
    let mut revision = use_signal(|| 0u64);
    let mut loaded = use_signal(|| false);
    let mut criteria = use_signal(Criteria::default);

    // The feed lives as long as this page; unmounting drops the task and
    // with it the subscription.
    use_future(move || {
        let gateway = market.gateway.clone();
        async move {
            let mut feed = gateway.subscribe_all();
            while let Some(snapshot) = feed.next().await {
                tracing::debug!(count = snapshot.len(), "home feed update");
                listings.set(snapshot);
                revision += 1;
                loaded.set(true);
            }
        }
    });

    let memo = use_hook(|| Rc::new(RefCell::new(QueryMemo::new())));
    let visible = use_memo(move || {
        memo.borrow_mut()
            .get(revision(), &listings.read(), &criteria.read())
            .clone()
    });

    let current = criteria.read().clone();
    let visible = visible.read();
    let summary = visible.summary();

    rsx! {
        div { class: "home",
            section { class: "filters",
                input {
                    class: "search",
                    r#type: "search",
                    placeholder: "Search title or description…",
                    value: "{current.search}",
                    oninput: move |evt| criteria.write().search = evt.value(),
                }
                select {
                    value: "{current.category.label()}",
                    onchange: move |evt| {
                        if let Ok(category) = evt.value().parse::<CategoryFilter>() {
                            criteria.write().category = category;
                        }
                    },
                    option { value: "All", "All categories" }
                    for category in Category::all() {
                        option { value: "{category.label()}", "{category.label()}" }
                    }
                }
                select {
                    value: "{current.condition.label()}",
                    onchange: move |evt| {
                        if let Ok(condition) = evt.value().parse::<ConditionFilter>() {
                            criteria.write().condition = condition;
                        }
                    },
                    option { value: "Any", "Any condition" }
                    for condition in Condition::all() {
                        option { value: "{condition.label()}", "{condition.label()}" }
                    }
                }
                input {
                    r#type: "number",
                    min: "0",
                    placeholder: "Min ₹",
                    value: "{current.min_price}",
                    oninput: move |evt| criteria.write().min_price = evt.value(),
                }
                input {
                    r#type: "number",
                    min: "0",
                    placeholder: "Max ₹",
                    value: "{current.max_price}",
                    oninput: move |evt| criteria.write().max_price = evt.value(),
                }
                input {
                    r#type: "text",
                    placeholder: "City",
                    value: "{current.city}",
                    oninput: move |evt| criteria.write().city = evt.value(),
                }
                select {
                    value: "{current.sort.code()}",
                    onchange: move |evt| {
                        if let Ok(sort) = evt.value().parse::<SortMode>() {
                            criteria.write().sort = sort;
                        }
                    },
                    for mode in SortMode::all() {
                        option { value: "{mode.code()}", "{mode.label()}" }
                    }
                }
                button {
                    class: "clear-btn",
                    onclick: move |_| criteria.write().clear(),
                    "Clear"
                }
            }

            if !loaded() {
                p { class: "page-loading", "Loading listings…" }
            } else {
                p { class: "result-meta", "{summary}" }
                if visible.items.is_empty() {
                    div { class: "empty-state",
                        p { "No listings match your filters." }
                    }
                } else {
                    div { class: "listing-grid",
                        for listing in visible.items.iter() {
                            ListingCard { key: "{listing.id}", listing: listing.clone() }
                        }
                    }
                }
            }
        }
    }
}
