//! Seed the catalog from a YAML item list.
//!
//! The file is a YAML sequence of items:
//!
//! ```yaml
//! - id: 1
//!   title: Gray Hooded Sweatshirt
//!   slogan: The top hooded sweatshirt we offer
//!   description: Unless you live in a nudist colony, there are moments ...
//!   category: Apparel
//!   price: "29.99"
//!   img_url: /img/products/hoodie.jpg
//! ```
//!
//! Items are upserted by id, so re-running a seed refreshes titles, prices
//! and so on without losing reviews customers have left since.

use std::collections::HashSet;
use std::path::Path;

use tracing::{error, info};

use mongomart_core::Item;
use mongomart_storefront::db::{self, PgCatalogStore};

use super::{CommandError, database_url};

/// Seed catalog items from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the database write fails.
pub async fn items(path: &Path) -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!(path = %path.display(), "Loading items from file");

    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let items = parse_items(&content)?;

    info!(items = items.len(), "Parsed item list");

    let errors = validate_items(&items);
    if !errors.is_empty() {
        error!("Item validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Validation(errors.len()));
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let written = PgCatalogStore::new(pool).upsert_items(&items).await?;

    info!("Seeding complete!");
    info!("  Items written: {written}");

    Ok(())
}

fn parse_items(content: &str) -> Result<Vec<Item>, CommandError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Problems that would make the seeded catalog inconsistent.
fn validate_items(items: &[Item]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        if !seen.insert(item.id) {
            errors.push(format!("item {} appears more than once", item.id));
        }
        if item.title.trim().is_empty() {
            errors.push(format!("item {} has no title", item.id));
        }
        if item.category.trim().is_empty() {
            errors.push(format!("item {} has no category", item.id));
        }
    }

    errors
}
