//! Catalog home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use mongomart_core::{ALL_CATEGORIES, CategorySummary, PageRequest, page_count};

use super::{ItemView, item_views, lenient_page};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: i64,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub category_param: String,
    pub categories: Vec<CategorySummary>,
    pub items: Vec<ItemView>,
    pub item_count: u64,
    pub pages: u64,
    pub page: u64,
}

/// Display one page of the catalog, optionally narrowed to a category.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<HomeTemplate> {
    let category = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());
    let page_size = state.config().items_per_page;
    let page = PageRequest::new(query.page, page_size);

    let categories = state.catalog().list_categories().await?;
    let items = state.catalog().list_items(&category, page).await?;
    let item_count = state.catalog().count_items(&category).await?;

    Ok(HomeTemplate {
        category_param: category,
        categories,
        items: item_views(&items),
        item_count,
        pages: page_count(item_count, page_size),
        page: u64::from(page.index()),
    })
}
