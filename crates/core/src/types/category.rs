//! Category aggregation.
//!
//! Category summaries are derived from the catalog on every request: one row
//! per distinct `category` value plus a synthetic "All" row whose count is the
//! total number of items.

use serde::{Deserialize, Serialize};

/// Name of the synthetic category that matches every item.
pub const ALL_CATEGORIES: &str = "All";

/// A category and the number of items in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub item_count: u64,
}

impl CategorySummary {
    #[must_use]
    pub fn new(name: impl Into<String>, item_count: u64) -> Self {
        Self {
            name: name.into(),
            item_count,
        }
    }
}

/// Map a requested category to a store filter: `None` means "no filter".
#[must_use]
pub fn category_filter(category: &str) -> Option<&str> {
    (category != ALL_CATEGORIES).then_some(category)
}

/// Build the category listing from per-category counts.
///
/// Appends the "All" row and sorts by ordinal (byte-wise, case-sensitive)
/// name comparison. "All" is not pinned to either end; it lands wherever its
/// name sorts.
#[must_use]
pub fn summarize_categories<I>(counts: I) -> Vec<CategorySummary>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut categories: Vec<CategorySummary> = counts
        .into_iter()
        .map(|(name, item_count)| CategorySummary { name, item_count })
        .collect();

    let total = categories.iter().map(|c| c.item_count).sum();
    categories.push(CategorySummary::new(ALL_CATEGORIES, total));

    // Stable, so equal names keep their input order.
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    categories
}
