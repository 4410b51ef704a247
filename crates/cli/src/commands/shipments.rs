//! Shipment commands.

use omnicart_core::{SellerId, ShipmentId, ShipmentStatus};
use omnicart_storefront::models::Shipment;
use omnicart_storefront::services::ServiceError;
use omnicart_storefront::state::AppState;

/// List shipments, for one seller or across the store.
///
/// # Errors
///
/// Returns `ServiceError::Store` if storage fails.
pub fn list(state: &AppState, seller: Option<&SellerId>) -> Result<Vec<Shipment>, ServiceError> {
    match seller {
        Some(seller) => state.orders().get_seller_shipments(seller),
        None => state.orders().get_all_shipments(),
    }
}

/// Move a shipment (and its order) to `status`.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` for an unknown shipment and
/// `ServiceError::InvalidTransition` if the lifecycle forbids the move.
pub fn set_status(
    state: &AppState,
    id: &ShipmentId,
    status: ShipmentStatus,
) -> Result<Shipment, ServiceError> {
    state.orders().update_shipment_status(id, status)
}
