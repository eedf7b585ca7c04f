use chrono::{TimeZone, Utc};

use oldgold_common::listing::{Category, Condition, Listing, ListingId, ListingPatch};
use oldgold_common::memory::MemoryStore;
use oldgold_common::query::{CategoryFilter, Criteria, QueryMemo, SortMode};
use oldgold_common::session::Owner;

use oldgold_store_integration::harness::Market;
use oldgold_store_integration::*;

fn raw_listing(id: &str, price: Option<f64>, created_secs: i64, category: Category) -> Listing {
    Listing {
        id: ListingId::from(id),
        title: id.to_string(),
        description: String::new(),
        price,
        category,
        condition: Condition::Used,
        location: "Lucknow".into(),
        images: vec![format!("https://i.ibb.co/{id}.jpg")],
        owner_id: "other-client".into(),
        seller_name: String::new(),
        seller_contact: String::new(),
        created_at: Utc.timestamp_opt(created_secs, 0).single(),
    }
}

#[tokio::test]
async fn home_feed_pushes_on_every_change() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    let asha = make_identity("asha", "Asha");
    let owner = Owner::from_session(Some(&asha));

    let mut feed = market.gateway.subscribe_all();
    assert_eq!(next_within(&mut feed, TIMEOUT).await, Some(vec![]));

    let first = market.gateway.create(&owner, &make_draft("Tripod", "900", "Agra")).await.unwrap();
    let snapshot = next_within(&mut feed, TIMEOUT).await.unwrap();
    assert_eq!(titles(&snapshot), ["Tripod"]);

    market.gateway.create(&owner, &make_draft("Camera bag", "1500", "Agra")).await.unwrap();
    let snapshot = next_within(&mut feed, TIMEOUT).await.unwrap();
    assert_eq!(titles(&snapshot), ["Camera bag", "Tripod"]);

    let patch = ListingPatch {
        price: Some(750.0),
        ..Default::default()
    };
    market.gateway.update_as(&asha, &first, patch).await.unwrap();
    let snapshot = next_within(&mut feed, TIMEOUT).await.unwrap();
    assert_eq!(snapshot[1].price, Some(750.0));

    market.gateway.delete_as(&asha, &first).await.unwrap();
    let snapshot = next_within(&mut feed, TIMEOUT).await.unwrap();
    assert_eq!(titles(&snapshot), ["Camera bag"]);
}

#[tokio::test]
async fn owner_feed_only_sees_own_listings() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    let asha = Owner::from_session(Some(&make_identity("asha", "Asha")));
    let ravi = Owner::from_session(Some(&make_identity("ravi", "Ravi")));

    market.gateway.create(&asha, &make_draft("Blender", "1200", "Pune")).await.unwrap();
    market.gateway.create(&ravi, &make_draft("Cooler", "4000", "Pune")).await.unwrap();
    market.gateway.create(&asha, &make_draft("Toaster", "800", "Pune")).await.unwrap();

    let mut mine = market.gateway.subscribe_by_owner("asha");
    let snapshot = next_within(&mut mine, TIMEOUT).await.unwrap();
    assert_eq!(titles(&snapshot), ["Toaster", "Blender"]);

    market.gateway.create(&ravi, &make_draft("Heater", "1800", "Pune")).await.unwrap();
    let snapshot = next_within(&mut mine, TIMEOUT).await.unwrap();
    assert_eq!(titles(&snapshot), ["Toaster", "Blender"]);
    assert!(snapshot.iter().all(|l| l.owner_id == "asha"));
}

#[tokio::test]
async fn unsubscribe_stops_pushes_and_releases_the_store() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();

    let home = market.gateway.subscribe_all();
    let mut mine = market.gateway.subscribe_by_owner("guest");
    assert_eq!(market.store.subscriber_count(), 2);

    home.unsubscribe();
    assert_eq!(market.store.subscriber_count(), 1);

    let page = tokio::spawn(async move {
        let _ = next_within(&mut mine, TIMEOUT).await;
        mine
    });
    let mine = page.await.unwrap();
    drop(mine);
    assert_eq!(market.store.subscriber_count(), 0);

    market
        .gateway
        .create(&Owner::guest(), &make_draft("Kettle", "600", "Kanpur"))
        .await
        .unwrap();
    assert_eq!(market.store.subscriber_count(), 0);
}

#[tokio::test]
async fn home_pipeline_over_live_feed() {
    tracing_subscriber::fmt::try_init().ok();
    let store = MemoryStore::new();
    store.put_raw(raw_listing("phone", Some(500.0), 1, Category::Mobiles));
    store.put_raw(raw_listing("car", Some(200.0), 2, Category::Cars));
    let market = Market::with_store(store);

    let mut feed = market.gateway.subscribe_all();
    let snapshot = next_within(&mut feed, TIMEOUT).await.unwrap();
    assert_eq!(titles(&snapshot), ["car", "phone"]);

    let mut memo = QueryMemo::new();
    let mut criteria = Criteria {
        sort: SortMode::PriceAscending,
        ..Default::default()
    };
    assert_eq!(titles(&memo.get(1, &snapshot, &criteria).items), ["car", "phone"]);

    criteria.category = CategoryFilter::Only(Category::Cars);
    assert_eq!(titles(&memo.get(1, &snapshot, &criteria).items), ["car"]);

    criteria.category = CategoryFilter::All;
    criteria.min_price = "300".into();
    let visible = memo.get(1, &snapshot, &criteria);
    assert_eq!(titles(&visible.items), ["phone"]);
    assert_eq!(visible.summary(), "Showing 1 of 2");

    market.store.put_raw(raw_listing("scooter", Some(45000.0), 3, Category::Bikes));
    let snapshot = latest(&mut feed).unwrap();
    let visible = memo.get(2, &snapshot, &criteria);
    assert_eq!(titles(&visible.items), ["phone", "scooter"]);
    assert_eq!(visible.summary(), "Showing 2 of 3");
}
