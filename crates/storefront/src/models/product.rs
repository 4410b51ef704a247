//! Catalog product record.

use chrono::{DateTime, Utc};
use omnicart_core::{ProductId, SellerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest unit price accepted for a locally created or edited product.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A product in the merged catalog view.
///
/// Seed products and local overrides share this shape; an override with the
/// same `id` as a seed product replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Units in stock.
    pub quantity: u32,
    /// Average rating, 0 to 5.
    pub rating: f64,
    pub category_name: String,
    pub image_url: String,
    pub seller_id: SellerId,
    pub seller_name: String,
    pub brand: String,
    pub reviews: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub popularity: f64,
}

/// Result of deleting a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub id: ProductId,
}
