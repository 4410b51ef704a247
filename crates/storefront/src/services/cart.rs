//! Per-user carts.

use std::sync::Arc;

use omnicart_core::{ProductId, UserId};
use tracing::instrument;

use super::{ServiceError, enrich};
use crate::catalog::CatalogService;
use crate::models::{CartItem, CartView, Product};
use crate::store::{self, Documents, Transaction, keys};

/// Cart operations.
#[derive(Clone, Debug)]
pub struct CartService {
    docs: Arc<Documents>,
    catalog: CatalogService,
}

impl CartService {
    #[must_use]
    pub const fn new(docs: Arc<Documents>, catalog: CatalogService) -> Self {
        Self { docs, catalog }
    }

    /// The user's cart. Missing or unreadable storage is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Amount` if the subtotal overflows, or
    /// `ServiceError::Store` if the backend fails.
    pub fn get_cart(&self, user: &UserId) -> Result<CartView, ServiceError> {
        let items: Vec<CartItem> = self.docs.read(&keys::cart(user), Vec::new)?;
        Ok(CartView::try_from(items)?)
    }

    /// Add `quantity` (default 1) of a product.
    ///
    /// Repeated adds sum quantities on the existing line. Snapshot fields are
    /// taken from the catalog the first time the lookup succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Amount` if the new subtotal overflows, in which
    /// case nothing is written, or `ServiceError::Store` if the backend
    /// fails. Catalog failures only leave the snapshot empty.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        user: &UserId,
        product_id: &ProductId,
        quantity: Option<u32>,
    ) -> Result<CartView, ServiceError> {
        let quantity = quantity.filter(|q| *q > 0).unwrap_or(1);
        let product = enrich(&self.catalog, product_id).await;

        let docs = Arc::clone(&self.docs);
        let (user, product_id) = (user.clone(), product_id.clone());
        store::blocking(move || {
            docs.transaction(|tx| add_line(tx, &user, &product_id, quantity, product.as_ref()))
        })
        .await
    }

    /// Set a line's quantity; zero removes it. Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Amount` if the new subtotal overflows, in which
    /// case nothing is written, or `ServiceError::Store` if the backend
    /// fails.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product_id))]
    pub fn update_quantity(
        &self,
        user: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartView, ServiceError> {
        let key = keys::cart(user);
        self.docs.transaction(|tx| {
            let mut items: Vec<CartItem> = tx.read(&key, Vec::new)?;
            if quantity == 0 {
                items.retain(|i| i.product_id != *product_id);
            } else if let Some(item) = items.iter_mut().find(|i| i.product_id == *product_id) {
                item.quantity = quantity;
            }
            tx.write(&key, &items)?;
            Ok::<_, ServiceError>(CartView::try_from(items)?)
        })
    }

    /// Remove a product's line, if any.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product_id))]
    pub fn remove_from_cart(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<CartView, ServiceError> {
        self.update_quantity(user, product_id, 0)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub fn clear_cart(&self, user: &UserId) -> Result<CartView, ServiceError> {
        self.docs.transaction(|tx| {
            tx.remove(&keys::cart(user));
            Ok::<_, ServiceError>(())
        })?;
        Ok(CartView::empty())
    }
}

/// Merge a line into the user's cart inside an open transaction.
///
/// Fails with `ServiceError::Amount` when the merged subtotal overflows,
/// which aborts the transaction.
pub(crate) fn add_line(
    tx: &mut Transaction<'_>,
    user: &UserId,
    product_id: &ProductId,
    quantity: u32,
    product: Option<&Product>,
) -> Result<CartView, ServiceError> {
    let key = keys::cart(user);
    let mut items: Vec<CartItem> = tx.read(&key, Vec::new)?;

    match items.iter_mut().find(|i| i.product_id == *product_id) {
        Some(existing) => {
            existing.quantity = existing.quantity.saturating_add(quantity);
            if let Some(product) = product {
                existing.fill_snapshot(product);
            }
        }
        None => items.push(CartItem::new(product_id.clone(), quantity, product)),
    }

    tx.write(&key, &items)?;
    Ok(CartView::try_from(items)?)
}
