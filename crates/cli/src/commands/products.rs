//! Catalog commands.

use omnicart_core::{ProductId, SellerId};
use omnicart_storefront::catalog::{CatalogError, ProductQuery};
use omnicart_storefront::models::{DeleteOutcome, Product};
use omnicart_storefront::state::AppState;

/// List the merged catalog, optionally restricted to one seller.
///
/// # Errors
///
/// Returns `CatalogError` if the seed catalog or storage is unavailable.
pub async fn list(
    state: &AppState,
    query: &ProductQuery,
    seller: Option<&SellerId>,
) -> Result<Vec<Product>, CatalogError> {
    match seller {
        Some(seller) => state.catalog().list_by_seller(seller, query).await,
        None => state.catalog().list_products(query).await,
    }
}

/// Delete a product by id.
///
/// # Errors
///
/// Returns `CatalogError::Store` if storage fails.
pub fn delete(state: &AppState, id: &ProductId) -> Result<DeleteOutcome, CatalogError> {
    state.catalog().delete_product(id)
}
