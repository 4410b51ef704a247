//! Storage key names.
//!
//! Key names match those used by earlier browser-storage builds so existing
//! exports can be dropped into a data directory unchanged.

use omnicart_core::UserId;

pub const CUSTOM_PRODUCTS: &str = "omnicart_custom_products";
pub const DELETED_PRODUCTS: &str = "omnicart_deleted_product_ids";
pub const ORDERS: &str = "omnicart_orders";
pub const SHIPMENTS: &str = "omnicart_shipments";
pub const ADS: &str = "omnicart_ads";

pub const CART_PREFIX: &str = "omnicart_cart_";
pub const WISHLIST_PREFIX: &str = "omnicart_wishlist_";
pub const PREFERENCES_PREFIX: &str = "omnicart_preferences_";

#[must_use]
pub fn cart(user: &UserId) -> String {
    format!("{CART_PREFIX}{}", user.namespace())
}

#[must_use]
pub fn wishlist(user: &UserId) -> String {
    format!("{WISHLIST_PREFIX}{}", user.namespace())
}

#[must_use]
pub fn preferences(user: &UserId) -> String {
    format!("{PREFERENCES_PREFIX}{}", user.namespace())
}
