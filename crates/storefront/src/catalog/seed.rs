//! Remote seed catalog.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::CatalogError;
use super::normalize::product_from_value;
use crate::models::Product;

/// Where the read-only base catalog comes from.
#[derive(Debug, Clone)]
pub enum SeedSource {
    /// `GET url`, expecting `{"products": [...]}`.
    Remote { url: String, timeout: Duration },
    /// A fixed product list, used by tests and offline runs.
    Static(Vec<Value>),
}

/// Loads and caches the seed catalog.
///
/// Only successful remote fetches are cached; a failed fetch is retried on
/// the next call.
#[derive(Clone)]
pub struct SeedCatalog {
    source: SeedSource,
    client: reqwest::Client,
    cache: Option<Cache<String, Arc<Vec<Product>>>>,
}

impl SeedCatalog {
    /// Create a loader. A zero `cache_ttl` disables caching.
    #[must_use]
    pub fn new(source: SeedSource, cache_ttl: Duration) -> Self {
        let cache = (!cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(16)
                .time_to_live(cache_ttl)
                .build()
        });

        Self {
            source,
            client: reqwest::Client::new(),
            cache,
        }
    }

    /// The configured source.
    #[must_use]
    pub const fn source(&self) -> &SeedSource {
        &self.source
    }

    /// Load the normalized seed products in seed order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Fetch` on transport or decode failure and
    /// `CatalogError::Status` on a non-success response.
    pub async fn load(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        match &self.source {
            SeedSource::Static(raw) => Ok(Arc::new(normalize_all(raw))),
            SeedSource::Remote { url, timeout } => {
                if let Some(cache) = &self.cache
                    && let Some(products) = cache.get(url).await
                {
                    debug!("Cache hit for seed catalog");
                    return Ok(products);
                }

                let products = Arc::new(self.fetch(url, *timeout).await?);

                if let Some(cache) = &self.cache {
                    cache.insert(url.clone(), Arc::clone(&products)).await;
                }
                Ok(products)
            }
        }
    }

    /// Drop any cached seed so the next load refetches.
    pub async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<Product>, CatalogError> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Seed catalog returned non-success status");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let raw = payload
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let products = normalize_all(raw);
        debug!(count = products.len(), "Fetched seed catalog");
        Ok(products)
    }
}

impl std::fmt::Debug for SeedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedCatalog")
            .field("source", &self.source)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

fn normalize_all(raw: &[Value]) -> Vec<Product> {
    raw.iter().filter_map(product_from_value).collect()
}
