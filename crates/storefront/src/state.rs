//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use printshop_core::StoreSettings;

use crate::config::StorefrontConfig;
use crate::content::ContentStore;
use crate::db::{CatalogRepository, RepositoryError, SettingsRepository};
use crate::models::Category;

/// How long categories and store settings are served from memory.
///
/// Admin edits become visible on the storefront within this window.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for shared, rarely-changing data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Categories,
    Settings,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Categories(Arc<Vec<Category>>),
    Settings(Arc<StoreSettings>),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    content: ContentStore,
    cache: Cache<CacheKey, CacheValue>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool, content: ContentStore) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Static content (FAQ).
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Active categories with product counts, cached for [`CACHE_TTL`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the categories cannot be loaded.
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, RepositoryError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = Arc::new(CatalogRepository::new(self.pool()).list_categories().await?);
        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;
        Ok(categories)
    }

    /// Store settings, cached for [`CACHE_TTL`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the settings rows cannot be read.
    pub async fn settings(&self) -> Result<Arc<StoreSettings>, RepositoryError> {
        if let Some(CacheValue::Settings(settings)) =
            self.inner.cache.get(&CacheKey::Settings).await
        {
            debug!("Cache hit for settings");
            return Ok(settings);
        }

        let settings = Arc::new(SettingsRepository::new(self.pool()).load().await?);
        self.inner
            .cache
            .insert(CacheKey::Settings, CacheValue::Settings(Arc::clone(&settings)))
            .await;
        Ok(settings)
    }
}
