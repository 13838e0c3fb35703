//! Database migration command.
//!
//! Applies `crates/storefront/migrations/` to the database named by
//! `MONGOMART_DATABASE_URL` (or `DATABASE_URL`). Already-applied migrations
//! are skipped.

use mongomart_storefront::db;

use super::{CommandError, database_url};

/// Run the catalog migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running catalog migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
