//! Wishlist records.

use chrono::{DateTime, Utc};
use omnicart_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CartView, Product};

/// A saved product. At most one entry exists per product per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// A new entry, snapshotting `product` when it could be looked up.
    #[must_use]
    pub fn new(product_id: ProductId, product: Option<&Product>) -> Self {
        Self {
            product_id,
            name: product.map(|p| p.name.clone()).unwrap_or_default(),
            price: product.map(|p| p.price).unwrap_or_default(),
            image_url: product.map(|p| p.image_url.clone()).unwrap_or_default(),
            added_at: Utc::now(),
        }
    }
}

/// Result of moving a wishlist entry into the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishlistMove {
    pub wishlist: Vec<WishlistItem>,
    pub cart: CartView,
}
