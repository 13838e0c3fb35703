//! Catalog and cart persistence.
//!
//! # Database: `mongomart`
//!
//! ## Tables (schema `catalog`)
//!
//! - `item` - Catalog items; reviews are an append-only `JSONB` array and a
//!   generated `tsvector` column indexes title, slogan, and description
//! - `cart_line` - One row per `(user_id, item_id)` with a positive quantity
//!
//! # Store seam
//!
//! Route handlers only see the [`CatalogStore`] and [`CartStore`] traits.
//! [`PgCatalogStore`] and [`PgCartStore`] back them with `PostgreSQL`;
//! [`MemoryStore`] implements both in-process for tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p mongomart-cli -- migrate
//! ```

pub mod carts;
pub mod items;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use mongomart_core::{Cart, CartLine, CategorySummary, Item, ItemId, PageRequest, UserId};

pub use carts::PgCartStore;
pub use items::PgCatalogStore;
pub use memory::MemoryStore;

/// Number of items returned by [`CatalogStore::get_related_items`].
pub const RELATED_ITEMS_LIMIT: u32 = 4;

/// Largest quantity a cart line can hold; `cart_line.quantity` is an `INTEGER`.
pub const MAX_CART_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A cart line quantity would exceed [`MAX_CART_QUANTITY`].
    #[error("quantity cannot exceed {MAX_CART_QUANTITY}")]
    QuantityLimit,
}

/// Read-mostly access to the item catalog.
///
/// Every listing shares one pagination contract: filter, ascending id order,
/// then [`PageRequest`] offset and limit. The matching count operation uses
/// the same filter, so callers can compute the page count.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every category with its item count, plus the synthetic "All" row,
    /// sorted by name.
    async fn list_categories(&self) -> Result<Vec<CategorySummary>, RepositoryError>;

    /// One page of items in `category` ("All" for every item).
    async fn list_items(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, RepositoryError>;

    /// Number of items in `category` ("All" for every item).
    async fn count_items(&self, category: &str) -> Result<u64, RepositoryError>;

    /// One page of items whose title, slogan, or description match `query`.
    async fn search_items(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, RepositoryError>;

    /// Number of items matching `query`.
    async fn count_search_items(&self, query: &str) -> Result<u64, RepositoryError>;

    /// A single item, or `None` when no item has that id.
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// A small sample of items to show next to an item.
    async fn get_related_items(&self) -> Result<Vec<Item>, RepositoryError>;

    /// Append a review dated now and return the updated item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    async fn add_review(
        &self,
        item_id: ItemId,
        comment: &str,
        name: &str,
        stars: i32,
    ) -> Result<Item, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Per-user cart access. The user is always named explicitly.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The user's cart; empty if they never added anything.
    async fn get_cart(&self, user_id: &UserId) -> Result<Cart, RepositoryError>;

    /// The cart line for `item_id`, if it is in the user's cart.
    async fn item_in_cart(
        &self,
        user_id: &UserId,
        item_id: ItemId,
    ) -> Result<Option<CartLine>, RepositoryError>;

    /// Add one unit of `item`, creating the line or incrementing it.
    async fn add_item(&self, user_id: &UserId, item: &Item) -> Result<Cart, RepositoryError>;

    /// Set the exact quantity of a line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item is not in the cart.
    async fn update_quantity(
        &self,
        user_id: &UserId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Convert a `COUNT(*)` result, which `PostgreSQL` returns as `BIGINT`.
pub(crate) fn count_from_db(count: i64) -> Result<u64, RepositoryError> {
    u64::try_from(count)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative count {count}")))
}

/// Convert a page window to the `BIGINT` values `LIMIT`/`OFFSET` expect.
pub(crate) fn page_bounds(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit()).unwrap_or(i64::MAX),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}
