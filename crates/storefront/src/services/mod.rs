//! Commerce services.
//!
//! Each service is a cheap `Clone` handle over shared [`Documents`]. Every
//! mutation is one [`Documents::transaction`], so a read-modify-write never
//! loses a concurrent update from the same process and multi-document writes
//! (an order and its shipment) land together or not at all.
//!
//! Catalog lookups for cart and wishlist enrichment happen before the
//! transaction starts and degrade to an empty snapshot on failure. Async
//! operations then hand their transaction to [`store::blocking`]; the
//! synchronous ones are called from handlers the same way.
//!
//! [`Documents`]: crate::store::Documents
//! [`Documents::transaction`]: crate::store::Documents::transaction
//! [`store::blocking`]: crate::store::blocking

pub mod ads;
pub mod cart;
pub mod orders;
pub mod preferences;
pub mod wishlist;

pub use ads::AdService;
pub use cart::CartService;
pub use orders::OrderService;
pub use preferences::PreferenceService;
pub use wishlist::WishlistService;

use omnicart_core::{ProductId, ShipmentStatus};
use thiserror::Error;
use tracing::warn;

use crate::catalog::{CatalogError, CatalogService};
use crate::models::{AmountOverflow, Product};
use crate::store::StoreError;

/// Errors from service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A looked-up record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A money total cannot be represented.
    #[error(transparent)]
    Amount(#[from] AmountOverflow),

    /// The shipment status change is not allowed.
    #[error("Cannot change shipment status from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },
}

/// Look up a product for a cart or wishlist snapshot. Lookup failures are
/// logged and treated as a miss.
async fn enrich(catalog: &CatalogService, product_id: &ProductId) -> Option<Product> {
    match catalog.get_product(product_id).await {
        Ok(product) => product,
        Err(e) => {
            warn!(product_id = %product_id, error = %e, "Product enrichment failed");
            None
        }
    }
}
