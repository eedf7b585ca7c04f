pub mod app;
pub mod create_listing;
pub mod dom;
pub mod edit_listing;
pub mod home_view;
pub mod listing_card;
pub mod listing_details;
pub mod listing_form;
pub mod login_view;
pub mod market_api;
pub mod my_listings;
pub mod not_found;
pub mod profile_view;
pub mod shared_state;
pub mod theme_toggle;
