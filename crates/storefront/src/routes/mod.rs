//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                 - Liveness check
//! GET  /health/ready                           - Readiness check (store reachable)
//!
//! # Catalog
//! GET  /?category=<name>&page=<n>              - Paginated catalog
//! GET  /search?query=<text>&page=<n>           - Paginated search results
//! GET  /item/{item_id}                         - Item detail, reviews, related items
//! POST /item/{item_id}/reviews                 - Add a review, redirect to the item
//!
//! # Cart
//! GET  /cart                                   - Redirect to the default user's cart
//! GET  /user/{user_id}/cart                    - Cart page
//! POST /user/{user_id}/cart/items/{item_id}    - Add one unit of an item
//! POST /user/{user_id}/cart/items/{item_id}/quantity - Set a line's quantity
//! ```
//!
//! Page numbers are zero-based everywhere.

pub mod cart;
pub mod health;
pub mod home;
pub mod items;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Deserializer};

use mongomart_core::{Item, UserId};

use crate::error::AppError;
use crate::state::AppState;

/// Item display data for templates.
#[derive(Clone)]
pub struct ItemView {
    pub id: i32,
    pub title: String,
    pub slogan: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub img_url: String,
    pub stars: String,
    pub num_reviews: usize,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.as_i32(),
            title: item.title.clone(),
            slogan: item.slogan.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: item.price.to_string(),
            img_url: item.img_url.clone(),
            stars: format!("{:.1}", item.average_stars()),
            num_reviews: item.num_reviews(),
        }
    }
}

/// Map a page of items to display data.
pub(crate) fn item_views(items: &[Item]) -> Vec<ItemView> {
    items.iter().map(ItemView::from).collect()
}

/// Deserialize a page number the way browsers send it: missing, empty, or
/// malformed values all mean the first page.
pub(crate) fn lenient_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse().ok()).unwrap_or(0))
}

/// Parse a user id taken from the URL.
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    UserId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/item/{item_id}", get(items::show))
        .route("/item/{item_id}/reviews", post(items::add_review))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::default_cart))
        .route("/user/{user_id}/cart", get(cart::show))
        .route("/user/{user_id}/cart/items/{item_id}", post(cart::add))
        .route(
            "/user/{user_id}/cart/items/{item_id}/quantity",
            post(cart::update_quantity),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Catalog
        .route("/", get(home::home))
        .route("/search", get(search::search))
        .merge(item_routes())
        // Cart
        .merge(cart_routes())
}
