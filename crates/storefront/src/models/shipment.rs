//! Shipment records.

use chrono::{DateTime, Utc};
use omnicart_core::{OrderId, SellerId, ShipmentId, ShipmentStatus};
use serde::{Deserialize, Serialize};

/// Delivery record paired 1:1 with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub shipment_id: ShipmentId,
    pub order_id: OrderId,
    #[serde(default)]
    pub seller_id: Option<SellerId>,
    #[serde(default)]
    pub logistics_partner: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
}
