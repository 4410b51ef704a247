//! Per-user wishlists.

use std::sync::Arc;

use omnicart_core::{ProductId, UserId};
use tracing::{debug, instrument};

use super::{ServiceError, cart, enrich};
use crate::catalog::CatalogService;
use crate::models::{WishlistItem, WishlistMove};
use crate::store::{self, Documents, keys};

/// Wishlist operations.
#[derive(Clone, Debug)]
pub struct WishlistService {
    docs: Arc<Documents>,
    catalog: CatalogService,
}

impl WishlistService {
    #[must_use]
    pub const fn new(docs: Arc<Documents>, catalog: CatalogService) -> Self {
        Self { docs, catalog }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get_wishlist(&self, user: &UserId) -> Result<Vec<WishlistItem>, ServiceError> {
        Ok(self.docs.read(&keys::wishlist(user), Vec::new)?)
    }

    /// Save a product. Saving one that is already present changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product_id))]
    pub async fn add_to_wishlist(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<Vec<WishlistItem>, ServiceError> {
        let existing = {
            let wishlist = self.clone();
            let user = user.clone();
            store::blocking(move || wishlist.get_wishlist(&user)).await?
        };
        if existing.iter().any(|i| i.product_id == *product_id) {
            debug!("Already in wishlist");
            return Ok(existing);
        }

        let product = enrich(&self.catalog, product_id).await;
        let key = keys::wishlist(user);
        let docs = Arc::clone(&self.docs);
        let product_id = product_id.clone();

        store::blocking(move || {
            docs.transaction(|tx| {
                let mut items: Vec<WishlistItem> = tx.read(&key, Vec::new)?;
                // Re-check under the lock; another request may have added it
                if !items.iter().any(|i| i.product_id == product_id) {
                    items.push(WishlistItem::new(product_id.clone(), product.as_ref()));
                    tx.write(&key, &items)?;
                }
                Ok::<_, ServiceError>(items)
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product_id))]
    pub fn remove_from_wishlist(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<Vec<WishlistItem>, ServiceError> {
        let key = keys::wishlist(user);
        self.docs.transaction(|tx| {
            let mut items: Vec<WishlistItem> = tx.read(&key, Vec::new)?;
            items.retain(|i| i.product_id != *product_id);
            tx.write(&key, &items)?;
            Ok::<_, ServiceError>(items)
        })
    }

    /// Put one unit of a saved product in the cart and drop it from the
    /// wishlist, in one write.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is not on the
    /// wishlist, `ServiceError::Amount` if the cart subtotal would overflow,
    /// or `ServiceError::Store` if the backend fails. Nothing is written on
    /// error.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product_id))]
    pub async fn move_to_cart(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<WishlistMove, ServiceError> {
        let product = enrich(&self.catalog, product_id).await;
        let key = keys::wishlist(user);
        let docs = Arc::clone(&self.docs);
        let (user, product_id) = (user.clone(), product_id.clone());

        store::blocking(move || {
            docs.transaction(|tx| -> Result<WishlistMove, ServiceError> {
                let mut wishlist: Vec<WishlistItem> = tx.read(&key, Vec::new)?;
                let before = wishlist.len();
                wishlist.retain(|i| i.product_id != product_id);
                if wishlist.len() == before {
                    return Err(ServiceError::NotFound("Wishlist item not found".to_string()));
                }

                let cart = cart::add_line(tx, &user, &product_id, 1, product.as_ref())?;
                tx.write(&key, &wishlist)?;
                Ok(WishlistMove { wishlist, cart })
            })
        })
        .await
    }
}
