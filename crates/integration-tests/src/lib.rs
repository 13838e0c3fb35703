//! Integration tests for MongoMart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mongomart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_store` - Catalog store contracts (pagination, counts, reviews)
//! - `cart_store` - Cart store contracts (add, increment, set quantity)
//! - `storefront_http` - Router behaviour driven with `tower::ServiceExt::oneshot`
//!
//! Everything here runs against [`MemoryStore`], so no database is needed.

use std::path::PathBuf;
use std::sync::Arc;

use mongomart_core::{Item, ItemId, Price, UserId};
use mongomart_storefront::config::{
    DEFAULT_ITEMS_PER_PAGE, DEFAULT_USER_ID, MongomartConfig, SentryConfig,
};
use mongomart_storefront::db::MemoryStore;
use mongomart_storefront::state::AppState;
use rust_decimal::Decimal;
use secrecy::SecretString;

/// A catalog item with no reviews.
#[must_use]
pub fn item(id: i32, title: &str, category: &str, price: Decimal) -> Item {
    Item {
        id: ItemId::new(id),
        title: title.to_string(),
        description: format!("{title} description"),
        slogan: format!("{title} slogan"),
        category: category.to_string(),
        price: Price::new(price),
        img_url: format!("/img/products/{id}.jpg"),
        reviews: Vec::new(),
    }
}

/// Five items across three categories: Apparel {1, 4}, Kitchen {2, 5},
/// Books {3}.
#[must_use]
pub fn sample_items() -> Vec<Item> {
    vec![
        item(1, "Gray Hooded Sweatshirt", "Apparel", Decimal::new(2999, 2)),
        item(2, "Coffee Mug", "Kitchen", Decimal::new(1250, 2)),
        item(3, "MongoDB The Definitive Guide", "Books", Decimal::new(2000, 2)),
        item(4, "Track Jacket", "Apparel", Decimal::new(4500, 2)),
        item(5, "Brown Tumbler", "Kitchen", Decimal::new(900, 2)),
    ]
}

/// Items `1..=n`, all in `category`.
#[must_use]
pub fn numbered_items(n: i32, category: &str) -> Vec<Item> {
    (1..=n)
        .map(|id| item(id, &format!("Item {id}"), category, Decimal::ONE))
        .collect()
}

/// The default cart owner.
///
/// # Panics
///
/// Never; the default id is a valid `UserId`.
#[must_use]
#[allow(clippy::expect_used)]
pub fn default_user() -> UserId {
    UserId::parse(DEFAULT_USER_ID).expect("default user id is valid")
}

/// Configuration for tests; the database URL is never used.
#[must_use]
pub fn test_config() -> MongomartConfig {
    MongomartConfig {
        database_url: SecretString::from("postgres://localhost/mongomart_test"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        items_per_page: DEFAULT_ITEMS_PER_PAGE,
        default_user_id: default_user(),
        static_dir: PathBuf::from("../storefront/static"),
        sentry: SentryConfig::default(),
    }
}

/// Application state over a shared in-memory store.
#[must_use]
pub fn memory_state(store: &MemoryStore) -> AppState {
    AppState::new(
        test_config(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    )
}
