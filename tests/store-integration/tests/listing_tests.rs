use oldgold_common::backend::BackendError;
use oldgold_common::draft::ValidationError;
use oldgold_common::error::MarketError;
use oldgold_common::guard::{can_edit, EditAccess};
use oldgold_common::listing::ListingId;
use oldgold_common::memory::hosted_url;
use oldgold_common::session::{Owner, SessionState};

use oldgold_store_integration::harness::Market;
use oldgold_store_integration::*;

#[tokio::test]
async fn create_edit_delete_lifecycle() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    let asha = make_identity("asha", "Asha");

    let id = market
        .gateway
        .create(&Owner::from_session(Some(&asha)), &make_draft("Kindle Paperwhite", "6500", "Chennai"))
        .await
        .unwrap();

    let stored = market.gateway.fetch(&id).await.unwrap();
    assert_eq!(stored.owner_id, "asha");
    assert_eq!(stored.seller_name, "Asha");
    assert_eq!(stored.seller_contact, "9876543210");
    assert!(stored.created_at.is_some());

    let mut draft = make_draft("Kindle Paperwhite 11th gen", "5999", "Chennai");
    draft.seller_name = "Asha R".into();
    market.gateway.save_draft(&asha, &id, &draft).await.unwrap();

    let edited = market.gateway.fetch(&id).await.unwrap();
    assert_eq!(edited.title, "Kindle Paperwhite 11th gen");
    assert_eq!(edited.price, Some(5999.0));
    assert_eq!(edited.created_at, stored.created_at);
    assert_eq!(edited.owner_id, "asha");

    market.gateway.delete_as(&asha, &id).await.unwrap();
    assert_eq!(market.gateway.get(&id).await.unwrap(), None);
    assert!(market.store.is_empty());
}

#[tokio::test]
async fn zero_price_is_blocked_before_the_store() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();

    let err = market
        .gateway
        .create(&Owner::guest(), &make_draft("Free stuff", "0", "Goa"))
        .await
        .unwrap_err();

    assert_eq!(err, MarketError::Validation(ValidationError::InvalidPrice));
    assert_eq!(err.to_string(), "Price must be greater than 0");
    assert_eq!(market.store.calls().inserts, 0);
    assert!(market.store.is_empty());
}

#[tokio::test]
async fn signed_out_create_is_attributed_to_guest() {
    let market = Market::new();
    let id = market
        .gateway
        .create(&Owner::from_session(None), &make_draft("Old radio", "300", "Patna"))
        .await
        .unwrap();
    let listing = market.gateway.fetch(&id).await.unwrap();
    assert_eq!(listing.owner_id, "guest");
    assert_eq!(listing.seller_name, "Guest");
}

#[tokio::test]
async fn non_owner_cannot_edit_or_delete() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    let owner = make_identity("owner", "Owner");
    let intruder = make_identity("intruder", "Intruder");

    let id = market
        .gateway
        .create(&Owner::from_session(Some(&owner)), &make_draft("Gaming chair", "7000", "Noida"))
        .await
        .unwrap();

    let loaded = market.gateway.get(&id).await.unwrap();
    let intruder_session = SessionState::SignedIn(intruder.clone());
    assert_eq!(EditAccess::resolve(&intruder_session, Some(loaded.clone())), EditAccess::NotAuthorized);
    assert!(!can_edit(&intruder_session, loaded.as_ref().unwrap()));

    let err = market
        .gateway
        .save_draft(&intruder, &id, &make_draft("Mine now", "1", "Noida"))
        .await
        .unwrap_err();
    assert_eq!(err, MarketError::NotAuthorized(id.clone()));

    let err = market.gateway.delete_as(&intruder, &id).await.unwrap_err();
    assert_eq!(err, MarketError::NotAuthorized(id.clone()));

    let calls = market.store.calls();
    assert_eq!(calls.updates, 0);
    assert_eq!(calls.deletes, 0);
    assert_eq!(market.gateway.fetch(&id).await.unwrap().title, "Gaming chair");
}

#[tokio::test]
async fn missing_listing_is_not_found() {
    let market = Market::new();
    let asha = make_identity("asha", "Asha");
    let id = ListingId::from("does-not-exist");

    let loaded = market.gateway.get(&id).await.unwrap();
    assert_eq!(EditAccess::resolve(&SessionState::SignedIn(asha.clone()), Some(loaded)), EditAccess::NotFound);

    let err = market.gateway.delete_as(&asha, &id).await.unwrap_err();
    assert_eq!(err, MarketError::NotFound(id));
    assert_eq!(market.store.calls().deletes, 0);
}

#[tokio::test]
async fn delete_cleans_up_hosted_images_and_ignores_failures() {
    tracing_subscriber::fmt::try_init().ok();
    let market = Market::new();
    let asha = make_identity("asha", "Asha");

    let mut draft = make_draft("Road bike", "12000", "Mysuru");
    draft.image_urls = [
        hosted_url(BUCKET, "listings/asha/1_front.jpg"),
        hosted_url(BUCKET, "listings/asha/2_side.jpg"),
        hosted_url("someone-elses-bucket", "listings/x.jpg"),
        "https://i.ibb.co/road-bike.jpg".to_string(),
    ]
    .join(", ");
    let id = market
        .gateway
        .create(&Owner::from_session(Some(&asha)), &draft)
        .await
        .unwrap();

    market.blobs.fail_on("listings/asha/2_side.jpg");
    market.gateway.delete_as(&asha, &id).await.unwrap();

    assert_eq!(market.blobs.deleted(), ["listings/asha/1_front.jpg"]);
    assert_eq!(market.gateway.get(&id).await.unwrap(), None);
}

#[tokio::test]
async fn store_outage_surfaces_as_backend_error() {
    let market = Market::new();
    market
        .store
        .set_failure(Some(BackendError::unavailable("The service is currently unavailable.")));

    let err = market
        .gateway
        .create(&Owner::guest(), &make_draft("Desk lamp", "450", "Surat"))
        .await
        .unwrap_err();

    assert!(matches!(err, MarketError::Backend(ref e) if e.code == "unavailable"));
    assert_eq!(err.to_string(), "The service is currently unavailable.");
}
