//! `PostgreSQL` cart store.
//!
//! Each mutation runs in a transaction together with the read that builds the
//! returned cart, so callers always see their own write.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use mongomart_core::{Cart, CartLine, Item, ItemId, Price, UserId};

use super::{CartStore, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    item_id: ItemId,
    title: String,
    img_url: String,
    price: Decimal,
    quantity: i32,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "cart line for item {} has quantity {}",
                row.item_id, row.quantity
            ))
        })?;

        Ok(Self {
            item_id: row.item_id,
            title: row.title,
            img_url: row.img_url,
            price: Price::new(row.price),
            quantity,
        })
    }
}

/// Cart store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a new cart store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Load a user's cart lines in the order they were added.
async fn fetch_cart<'e, E>(executor: E, user_id: &UserId) -> Result<Cart, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<CartLineRow> = sqlx::query_as(
        r"
        SELECT l.item_id, i.title, i.img_url, i.price, l.quantity
        FROM catalog.cart_line l
        JOIN catalog.item i ON i.id = l.item_id
        WHERE l.user_id = $1
        ORDER BY l.position
        ",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    let items = rows
        .into_iter()
        .map(CartLine::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Cart {
        user_id: user_id.clone(),
        items,
    })
}

#[async_trait]
impl CartStore for PgCartStore {
    #[instrument(skip(self))]
    async fn get_cart(&self, user_id: &UserId) -> Result<Cart, RepositoryError> {
        fetch_cart(&self.pool, user_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %user_id, "Failed to retrieve cart"))
    }

    #[instrument(skip(self))]
    async fn item_in_cart(
        &self,
        user_id: &UserId,
        item_id: ItemId,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let row: Option<CartLineRow> = sqlx::query_as(
            r"
            SELECT l.item_id, i.title, i.img_url, i.price, l.quantity
            FROM catalog.cart_line l
            JOIN catalog.item i ON i.id = l.item_id
            WHERE l.user_id = $1 AND l.item_id = $2
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, %user_id, %item_id, "Failed to look up cart line");
        })?;

        row.map(CartLine::try_from).transpose()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn add_item(&self, user_id: &UserId, item: &Item) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // A line already at the cap is left alone and reports no affected row
        let result = sqlx::query(
            r"
            INSERT INTO catalog.cart_line (user_id, item_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET quantity = catalog.cart_line.quantity + 1
            WHERE catalog.cart_line.quantity < $3
            ",
        )
        .bind(user_id)
        .bind(item.id)
        .bind(i32::MAX)
        .execute(&mut *tx)
        .await
        .inspect_err(|e| tracing::error!(error = %e, %user_id, "Failed to add item to cart"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::QuantityLimit);
        }

        let cart = fetch_cart(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn update_quantity(
        &self,
        user_id: &UserId,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError> {
        let quantity = i32::try_from(quantity).map_err(|_| RepositoryError::QuantityLimit)?;
        let mut tx = self.pool.begin().await?;

        let result = if quantity == 0 {
            sqlx::query("DELETE FROM catalog.cart_line WHERE user_id = $1 AND item_id = $2")
                .bind(user_id)
                .bind(item_id)
                .execute(&mut *tx)
                .await
        } else {
            sqlx::query(
                "UPDATE catalog.cart_line SET quantity = $3 WHERE user_id = $1 AND item_id = $2",
            )
            .bind(user_id)
            .bind(item_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await
        };
        let result = result.inspect_err(|e| {
            tracing::error!(error = %e, %user_id, %item_id, "Failed to update cart quantity");
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let cart = fetch_cart(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(cart)
    }
}
