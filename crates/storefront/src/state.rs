//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::MongomartConfig;
use crate::db::{CartStore, CatalogStore, PgCartStore, PgCatalogStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the catalog and cart stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MongomartConfig,
    catalog: Arc<dyn CatalogStore>,
    carts: Arc<dyn CartStore>,
}

impl AppState {
    /// Create application state over arbitrary stores.
    #[must_use]
    pub fn new(
        config: MongomartConfig,
        catalog: Arc<dyn CatalogStore>,
        carts: Arc<dyn CartStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Create application state backed by `PostgreSQL`.
    #[must_use]
    pub fn with_pool(config: MongomartConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgCatalogStore::new(pool.clone())),
            Arc::new(PgCartStore::new(pool)),
        )
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &MongomartConfig {
        &self.inner.config
    }

    /// Get the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.inner.catalog.as_ref()
    }

    /// Get the cart store.
    #[must_use]
    pub fn carts(&self) -> &dyn CartStore {
        self.inner.carts.as_ref()
    }
}
