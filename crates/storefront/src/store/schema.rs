//! Record types stored under each key.

use omnicart_core::ProductId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::keys;
use crate::models::{Ad, CartItem, Order, Preferences, Shipment, WishlistItem};

/// Whether `data` decodes as the record type stored under `key`.
///
/// Unknown keys never validate, so migration leaves them alone.
pub fn validates(key: &str, data: &Value) -> bool {
    match key {
        keys::CUSTOM_PRODUCTS => fits::<Vec<Map<String, Value>>>(data),
        keys::DELETED_PRODUCTS => fits::<Vec<ProductId>>(data),
        keys::ORDERS => fits::<Vec<Order>>(data),
        keys::SHIPMENTS => fits::<Vec<Shipment>>(data),
        keys::ADS => fits::<Vec<Ad>>(data),
        _ if key.starts_with(keys::CART_PREFIX) => fits::<Vec<CartItem>>(data),
        _ if key.starts_with(keys::WISHLIST_PREFIX) => fits::<Vec<WishlistItem>>(data),
        _ if key.starts_with(keys::PREFERENCES_PREFIX) => fits::<Preferences>(data),
        _ => false,
    }
}

fn fits<T: DeserializeOwned>(data: &Value) -> bool {
    serde_json::from_value::<T>(data.clone()).is_ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_orders_must_decode() {
        assert!(validates(keys::ORDERS, &json!([])));
        assert!(!validates(keys::ORDERS, &json!("oops")));
        assert!(!validates(keys::ORDERS, &json!([{"orderId": "ORD-1"}])));
    }

    #[test]
    fn test_unknown_keys_do_not_validate() {
        assert!(!validates("something_else", &json!([])));
    }

    #[test]
    fn test_user_scoped_keys() {
        assert!(validates("omnicart_cart_u1", &json!([])));
        assert!(validates("omnicart_wishlist_u1", &json!([])));
        assert!(!validates("omnicart_cart_u1", &json!({"productId": "1"})));
    }
}
