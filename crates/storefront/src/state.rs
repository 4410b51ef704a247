//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogService, SeedSource};
use crate::config::StorefrontConfig;
use crate::services::{AdService, CartService, OrderService, PreferenceService, WishlistService};
use crate::store::{Documents, KeyValueStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands out the services,
/// which all share one [`Documents`] layer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    docs: Arc<Documents>,
    catalog: CatalogService,
    cart: CartService,
    wishlist: WishlistService,
    orders: OrderService,
    ads: AdService,
    preferences: PreferenceService,
}

impl AppState {
    /// Create state over `store`, seeding the catalog from the configured URL.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let seed = config.seed_source();
        Self::with_seed(config, store, seed)
    }

    /// Create state with an explicit seed source.
    #[must_use]
    pub fn with_seed(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        seed: SeedSource,
    ) -> Self {
        let docs = Arc::new(Documents::new(store));
        let catalog = CatalogService::new(Arc::clone(&docs), seed, config.seed_cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                cart: CartService::new(Arc::clone(&docs), catalog.clone()),
                wishlist: WishlistService::new(Arc::clone(&docs), catalog.clone()),
                orders: OrderService::new(Arc::clone(&docs)),
                ads: AdService::new(Arc::clone(&docs)),
                preferences: PreferenceService::new(Arc::clone(&docs), catalog.clone()),
                catalog,
                docs,
                config,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn docs(&self) -> &Arc<Documents> {
        &self.inner.docs
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistService {
        &self.inner.wishlist
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn ads(&self) -> &AdService {
        &self.inner.ads
    }

    #[must_use]
    pub fn preferences(&self) -> &PreferenceService {
        &self.inner.preferences
    }
}
