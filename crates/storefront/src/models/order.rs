//! Order records and the checkout request that creates them.

use chrono::{DateTime, Utc};
use omnicart_core::{OrderId, ProductId, SellerId, ShipmentStatus, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AmountOverflow;
use crate::coerce;

pub const DEFAULT_USER_NAME: &str = "Customer";
pub const DEFAULT_PAYMENT_TYPE: &str = "COD";
pub const DEFAULT_ITEM_NAME: &str = "Product";

/// A placed order. Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub address: String,
    pub total_amount: Decimal,
    #[serde(default = "default_payment_type")]
    pub payment_type: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A normalized order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<SellerId>,
}

impl OrderItem {
    /// `price × quantity`, or `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Checkout payload as sent by clients.
///
/// Numeric fields are accepted as numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub total: Option<Value>,
    pub total_amount: Option<Value>,
    pub user_name: Option<String>,
    pub address: Option<String>,
    pub payment_type: Option<String>,
    pub seller_id: Option<SellerId>,
    /// Empty the user's cart in the same write as the order.
    #[serde(default)]
    pub clear_cart: bool,
}

/// One line of an [`OrderRequest`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: Value,
    pub quantity: Option<Value>,
    pub price: Option<Value>,
    pub name: Option<String>,
    pub seller_id: Option<SellerId>,
}

impl OrderItemInput {
    /// Build an input line from typed values.
    #[must_use]
    pub fn new(product_id: &str, quantity: u32, price: Decimal) -> Self {
        Self {
            product_id: Value::from(product_id),
            quantity: Some(Value::from(quantity)),
            price: Some(Value::from(price.to_string())),
            name: None,
            seller_id: None,
        }
    }

    /// Normalize into an [`OrderItem`].
    ///
    /// Missing or zero quantities become 1, missing prices 0, and a blank
    /// name becomes `"Product"`.
    #[must_use]
    pub fn normalize(&self) -> OrderItem {
        let quantity = self
            .quantity
            .as_ref()
            .and_then(coerce::count)
            .filter(|q| *q > 0)
            .unwrap_or(1);
        let price = self
            .price
            .as_ref()
            .and_then(coerce::decimal)
            .unwrap_or_default();
        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string());

        OrderItem {
            product_id: ProductId::new(coerce::text(&self.product_id).unwrap_or_default()),
            quantity,
            price,
            name,
            seller_id: self.seller_id.clone(),
        }
    }
}

impl OrderRequest {
    /// Resolve the order total.
    ///
    /// The first positive value of `total`, then `totalAmount`, wins;
    /// otherwise the total is the sum of the normalized lines.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the line sum cannot be represented.
    pub fn resolve_total(&self, items: &[OrderItem]) -> Result<Decimal, AmountOverflow> {
        let explicit = [&self.total, &self.total_amount]
            .into_iter()
            .flatten()
            .filter_map(coerce::decimal)
            .find(|amount| amount.is_sign_positive() && !amount.is_zero());
        if let Some(total) = explicit {
            return Ok(total);
        }

        items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| {
                item.line_total().and_then(|line| sum.checked_add(line))
            })
            .ok_or(AmountOverflow)
    }
}

fn default_user_name() -> String {
    DEFAULT_USER_NAME.to_string()
}

fn default_payment_type() -> String {
    DEFAULT_PAYMENT_TYPE.to_string()
}
