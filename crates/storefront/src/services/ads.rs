//! Promotional ads.

use std::sync::Arc;

use omnicart_core::AdId;
use tracing::{info, instrument};
use uuid::Uuid;

use super::ServiceError;
use crate::models::{Ad, AdInput, AdPatch};
use crate::store::{Documents, Transaction, keys};

/// Ad management.
#[derive(Clone, Debug)]
pub struct AdService {
    docs: Arc<Documents>,
}

impl AdService {
    #[must_use]
    pub const fn new(docs: Arc<Documents>) -> Self {
        Self { docs }
    }

    /// All ads. The default set is stored on first use.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn list_ads(&self) -> Result<Vec<Ad>, ServiceError> {
        self.docs.transaction(load)
    }

    /// Ads with `enabled` set.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn enabled_ads(&self) -> Result<Vec<Ad>, ServiceError> {
        Ok(self.list_ads()?.into_iter().filter(|ad| ad.enabled).collect())
    }

    /// Create an ad at the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self, input))]
    pub fn create_ad(&self, input: AdInput) -> Result<Ad, ServiceError> {
        let ad = Ad::from_input(AdId::new(format!("ad-{}", Uuid::new_v4().simple())), input);

        self.docs.transaction(|tx| {
            let mut ads = load(tx)?;
            ads.insert(0, ad.clone());
            tx.write(keys::ADS, &ads)?;
            Ok::<_, ServiceError>(())
        })?;

        info!(ad_id = %ad.id, "Created ad");
        Ok(ad)
    }

    /// Patch an ad in place.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no ad has `id`.
    #[instrument(skip(self, patch), fields(ad_id = %id))]
    pub fn update_ad(&self, id: &AdId, patch: AdPatch) -> Result<Ad, ServiceError> {
        self.docs.transaction(|tx| -> Result<Ad, ServiceError> {
            let mut ads = load(tx)?;
            let ad = ads
                .iter_mut()
                .find(|ad| ad.id == *id)
                .ok_or_else(|| ServiceError::NotFound("Ad not found".to_string()))?;
            ad.apply(patch);
            let updated = ad.clone();
            tx.write(keys::ADS, &ads)?;
            Ok(updated)
        })
    }

    /// Remove an ad. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self), fields(ad_id = %id))]
    pub fn delete_ad(&self, id: &AdId) -> Result<(), ServiceError> {
        self.docs.transaction(|tx| {
            let mut ads = load(tx)?;
            ads.retain(|ad| ad.id != *id);
            tx.write(keys::ADS, &ads)?;
            Ok::<_, ServiceError>(())
        })
    }
}

/// Read the ad list, staging the defaults when none is stored. An unreadable
/// list shows the defaults without replacing it.
fn load(tx: &mut Transaction<'_>) -> Result<Vec<Ad>, ServiceError> {
    let stored: Option<Vec<Ad>> = tx.read(keys::ADS, || None)?;
    match stored {
        Some(ads) => Ok(ads),
        None if tx.is_unreadable(keys::ADS) => Ok(Ad::defaults()),
        None => {
            let ads = Ad::defaults();
            tx.write(keys::ADS, &ads)?;
            Ok(ads)
        }
    }
}
