//! `PostgreSQL` catalog store.
//!
//! Items live in `catalog.item`. Text search runs against the generated
//! `search` column: the query is normalised by `plainto_tsquery` and its
//! terms are OR-ed together, so an item matches when any term matches.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use mongomart_core::{
    CategorySummary, Item, ItemId, PageRequest, Price, Review, category_filter,
    summarize_categories,
};

use super::{CatalogStore, RELATED_ITEMS_LIMIT, RepositoryError, count_from_db, page_bounds};

/// Row shape shared by every item query.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: ItemId,
    title: String,
    description: String,
    slogan: String,
    category: String,
    price: Decimal,
    img_url: String,
    reviews: Json<Vec<Review>>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            slogan: row.slogan,
            category: row.category,
            price: Price::new(row.price),
            img_url: row.img_url,
            reviews: row.reviews.0,
        }
    }
}

/// Catalog store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a new catalog store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or refresh catalog items by id.
    ///
    /// Existing items keep their reviews; the seed's reviews are only used
    /// for items that are inserted for the first time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    pub async fn upsert_items(&self, items: &[Item]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for item in items {
            let result = sqlx::query(
                r"
                INSERT INTO catalog.item
                    (id, title, description, slogan, category, price, img_url, reviews)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    slogan = EXCLUDED.slogan,
                    category = EXCLUDED.category,
                    price = EXCLUDED.price,
                    img_url = EXCLUDED.img_url
                ",
            )
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.slogan)
            .bind(&item.category)
            .bind(item.price.amount())
            .bind(&item.img_url)
            .bind(Json(&item.reviews))
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<CategorySummary>, RepositoryError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"
            SELECT category, COUNT(*)
            FROM catalog.item
            GROUP BY category
            ",
        )
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to aggregate categories"))?;

        let counts = rows
            .into_iter()
            .map(|(name, count)| count_from_db(count).map(|count| (name, count)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summarize_categories(counts))
    }

    #[instrument(skip(self))]
    async fn list_items(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, RepositoryError> {
        let (limit, offset) = page_bounds(page);
        let rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT id, title, description, slogan, category, price, img_url, reviews
            FROM catalog.item
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(category_filter(category))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, category, "Failed to retrieve page items");
        })?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_items(&self, category: &str) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM catalog.item
            WHERE ($1::text IS NULL OR category = $1)
            ",
        )
        .bind(category_filter(category))
        .fetch_one(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, category, "Failed to count items"))?;

        count_from_db(count)
    }

    #[instrument(skip(self))]
    async fn search_items(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, RepositoryError> {
        let (limit, offset) = page_bounds(page);
        let rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT id, title, description, slogan, category, price, img_url, reviews
            FROM catalog.item
            WHERE search @@ replace(plainto_tsquery('english', $1)::text, '&', '|')::tsquery
            ORDER BY id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, query, "Failed to search items"))?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_search_items(&self, query: &str) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM catalog.item
            WHERE search @@ replace(plainto_tsquery('english', $1)::text, '&', '|')::tsquery
            ",
        )
        .bind(query)
        .fetch_one(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, query, "Failed to count search results"))?;

        count_from_db(count)
    }

    #[instrument(skip(self))]
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row: Option<ItemRow> = sqlx::query_as(
            r"
            SELECT id, title, description, slogan, category, price, img_url, reviews
            FROM catalog.item
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, %id, "Failed to retrieve item"))?;

        Ok(row.map(Item::from))
    }

    #[instrument(skip(self))]
    async fn get_related_items(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r"
            SELECT id, title, description, slogan, category, price, img_url, reviews
            FROM catalog.item
            ORDER BY id
            LIMIT $1
            ",
        )
        .bind(i64::from(RELATED_ITEMS_LIMIT))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to retrieve related items"))?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self, comment))]
    async fn add_review(
        &self,
        item_id: ItemId,
        comment: &str,
        name: &str,
        stars: i32,
    ) -> Result<Item, RepositoryError> {
        let review = Review::new(name, comment, stars);

        // Single statement: the returned row already contains the new review.
        let row: Option<ItemRow> = sqlx::query_as(
            r"
            UPDATE catalog.item
            SET reviews = reviews || jsonb_build_array($2::jsonb)
            WHERE id = $1
            RETURNING id, title, description, slogan, category, price, img_url, reviews
            ",
        )
        .bind(item_id)
        .bind(Json(&review))
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = %e, %item_id, "Failed to add review"))?;

        row.map(Item::from).ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
