//! Order commands.

use omnicart_core::{OrderId, UserId};
use omnicart_storefront::models::Order;
use omnicart_storefront::services::ServiceError;
use omnicart_storefront::state::AppState;

/// List orders, for one user or across the store.
///
/// # Errors
///
/// Returns `ServiceError::Store` if storage fails.
pub fn list(state: &AppState, user: Option<&UserId>) -> Result<Vec<Order>, ServiceError> {
    match user {
        Some(user) => state.orders().get_user_orders(user),
        None => state.orders().get_all_orders(),
    }
}

/// Fetch one order.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` for an unknown id.
pub fn show(state: &AppState, id: &OrderId) -> Result<Order, ServiceError> {
    state
        .orders()
        .get_order_by_id(id)?
        .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
}
