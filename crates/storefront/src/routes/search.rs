//! Search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use mongomart_core::{PageRequest, page_count};

use super::{ItemView, item_views, lenient_page};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Search page query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: i64,
}

/// Search results page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub query_string: String,
    pub items: Vec<ItemView>,
    pub item_count: u64,
    pub pages: u64,
    pub page: u64,
}

/// Display one page of full-text search results.
///
/// An empty query is passed through to the store, which matches nothing.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let page_size = state.config().items_per_page;
    let page = PageRequest::new(query.page, page_size);

    let items = state.catalog().search_items(&query.query, page).await?;
    let item_count = state.catalog().count_search_items(&query.query).await?;

    Ok(SearchTemplate {
        query_string: query.query,
        items: item_views(&items),
        item_count,
        pages: page_count(item_count, page_size),
        page: u64::from(page.index()),
    })
}
