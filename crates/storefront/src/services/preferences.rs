//! Per-user UI preferences and browsing history.

use std::collections::HashMap;
use std::sync::Arc;

use omnicart_core::{ProductId, Theme, UserId};
use tracing::instrument;

use super::ServiceError;
use crate::catalog::CatalogService;
use crate::models::{BrowseDefaults, Preferences, PreferencesUpdate, Product};
use crate::store::{self, Documents, keys};

/// Preference operations.
#[derive(Clone, Debug)]
pub struct PreferenceService {
    docs: Arc<Documents>,
    catalog: CatalogService,
}

impl PreferenceService {
    #[must_use]
    pub const fn new(docs: Arc<Documents>, catalog: CatalogService) -> Self {
        Self { docs, catalog }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get(&self, user: &UserId) -> Result<Preferences, ServiceError> {
        Ok(self.docs.read(&keys::preferences(user), Preferences::default)?)
    }

    /// Apply the fields present in `update`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self, update), fields(user_id = %user))]
    pub fn update(
        &self,
        user: &UserId,
        update: PreferencesUpdate,
    ) -> Result<Preferences, ServiceError> {
        self.modify(user, |prefs| {
            if let Some(theme) = update.theme {
                prefs.theme = theme;
            }
            if let Some(location) = update.location {
                prefs.location = location;
            }
            if update.preferred_category.is_some() {
                prefs.preferred_category = update.preferred_category;
            }
            if update.preferred_sort.is_some() {
                prefs.preferred_sort = update.preferred_sort;
            }
        })
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn set_theme(&self, user: &UserId, theme: Theme) -> Result<Preferences, ServiceError> {
        self.modify(user, |prefs| prefs.theme = theme)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn set_location(
        &self,
        user: &UserId,
        location: impl Into<String>,
    ) -> Result<Preferences, ServiceError> {
        let location = location.into();
        self.modify(user, |prefs| prefs.location = location)
    }

    /// Remember a category and sort for the next catalog visit.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn set_browse_defaults(
        &self,
        user: &UserId,
        category: Option<String>,
        sort: Option<String>,
    ) -> Result<Preferences, ServiceError> {
        self.modify(user, |prefs| {
            prefs.preferred_category = category;
            prefs.preferred_sort = sort;
        })
    }

    /// Return the remembered category and sort, clearing them.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub fn take_browse_defaults(&self, user: &UserId) -> Result<BrowseDefaults, ServiceError> {
        let key = keys::preferences(user);
        self.docs.transaction(|tx| {
            let mut prefs: Preferences = tx.read(&key, Preferences::default)?;
            let taken = BrowseDefaults {
                category: prefs.preferred_category.take(),
                sort: prefs.preferred_sort.take(),
            };
            if taken != BrowseDefaults::default() {
                tx.write(&key, &prefs)?;
            }
            Ok::<_, ServiceError>(taken)
        })
    }

    /// Note that `user` viewed a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn record_view(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<Preferences, ServiceError> {
        self.modify(user, |prefs| prefs.record_view(product_id.clone()))
    }

    /// Recently viewed products that still exist, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or storage fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn recently_viewed(&self, user: &UserId) -> Result<Vec<Product>, ServiceError> {
        let viewed = {
            let prefs = self.clone();
            let user = user.clone();
            store::blocking(move || prefs.get(&user)).await?.recently_viewed
        };
        if viewed.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<ProductId, Product> = self
            .catalog
            .merged()
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(viewed.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    fn modify(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut Preferences),
    ) -> Result<Preferences, ServiceError> {
        let key = keys::preferences(user);
        self.docs.transaction(|tx| {
            let mut prefs: Preferences = tx.read(&key, Preferences::default)?;
            f(&mut prefs);
            tx.write(&key, &prefs)?;
            Ok::<_, ServiceError>(prefs)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::catalog::SeedSource;
    use crate::models::preferences::DEFAULT_LOCATION;
    use crate::store::MemoryStore;

    fn service() -> PreferenceService {
        let docs = Arc::new(Documents::new(Arc::new(MemoryStore::new())));
        let catalog = CatalogService::new(
            Arc::clone(&docs),
            SeedSource::Static(vec![json!({"id": 1}), json!({"id": 2})]),
            Duration::ZERO,
        );
        PreferenceService::new(docs, catalog)
    }

    #[test]
    fn test_defaults() {
        let prefs = service().get(&UserId::new("u1")).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.location, DEFAULT_LOCATION);
    }

    #[test]
    fn test_theme_and_location() {
        let service = service();
        let user = UserId::new("u1");
        service.set_theme(&user, Theme::Dark).unwrap();
        service.set_location(&user, "Pune 411001").unwrap();

        let prefs = service.get(&user).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.location, "Pune 411001");
    }

    #[test]
    fn test_browse_defaults_are_taken_once() {
        let service = service();
        let user = UserId::new("u1");
        service
            .set_browse_defaults(&user, Some("beauty".into()), Some("rating".into()))
            .unwrap();

        let taken = service.take_browse_defaults(&user).unwrap();
        assert_eq!(taken.category.as_deref(), Some("beauty"));
        assert_eq!(taken.sort.as_deref(), Some("rating"));
        assert_eq!(service.take_browse_defaults(&user).unwrap(), BrowseDefaults::default());
    }

    #[tokio::test]
    async fn test_recently_viewed_skips_missing_products() {
        let service = service();
        let user = UserId::new("u1");
        service.record_view(&user, &ProductId::new("1")).unwrap();
        service.record_view(&user, &ProductId::new("gone")).unwrap();
        service.record_view(&user, &ProductId::new("2")).unwrap();

        let products = service.recently_viewed(&user).await.unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }
}
