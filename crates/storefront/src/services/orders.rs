//! Orders and their shipments.
//!
//! Every order is created together with exactly one shipment, in one
//! transaction. A shipment's status is mirrored onto its order whenever it
//! changes, so the two never disagree.

use std::sync::Arc;

use chrono::Utc;
use omnicart_core::{OrderId, SellerId, ShipmentId, ShipmentStatus, UserId};
use rand::Rng;
use tracing::{info, instrument};

use super::ServiceError;
use crate::models::order::{DEFAULT_PAYMENT_TYPE, DEFAULT_USER_NAME};
use crate::models::{Order, OrderItem, OrderItemInput, OrderRequest, Shipment};
use crate::store::{Documents, keys};

const SHIPMENT_NOT_FOUND: &str = "Shipment not found";
const ORDER_NOT_FOUND: &str = "Order not found";

/// Order and shipment operations.
#[derive(Clone, Debug)]
pub struct OrderService {
    docs: Arc<Documents>,
}

impl OrderService {
    #[must_use]
    pub const fn new(docs: Arc<Documents>) -> Self {
        Self { docs }
    }

    /// Place an order and its `Pending` shipment.
    ///
    /// With `clearCart` set, the user's cart is emptied in the same write.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Amount` if the line total overflows, or
    /// `ServiceError::Store` if the backend fails or a stored order or
    /// shipment list cannot be read. Nothing is written in those cases.
    #[instrument(skip(self, request), fields(user_id = %user, items = request.items.len()))]
    pub fn place_order(&self, user: &UserId, request: OrderRequest) -> Result<Order, ServiceError> {
        let items: Vec<OrderItem> = request.items.iter().map(OrderItemInput::normalize).collect();
        let total_amount = request.resolve_total(&items)?;
        let now = Utc::now();

        let seller_id = request
            .seller_id
            .clone()
            .or_else(|| items.first().and_then(|i| i.seller_id.clone()));

        let order = Order {
            order_id: OrderId::new(generate_id("ORD")),
            user_id: user.clone(),
            user_name: non_blank(request.user_name)
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            order_date: now,
            status: ShipmentStatus::Pending,
            address: request.address.unwrap_or_default(),
            total_amount,
            payment_type: non_blank(request.payment_type)
                .unwrap_or_else(|| DEFAULT_PAYMENT_TYPE.to_string()),
            items,
        };

        let shipment = Shipment {
            shipment_id: ShipmentId::new(generate_id("SHP")),
            order_id: order.order_id.clone(),
            seller_id,
            logistics_partner: None,
            tracking_number: None,
            status: ShipmentStatus::Pending,
            shipped_at: Some(now),
            estimated_delivery: None,
        };

        self.docs.transaction(|tx| {
            let mut orders: Vec<Order> = tx.read(keys::ORDERS, Vec::new)?;
            let mut shipments: Vec<Shipment> = tx.read(keys::SHIPMENTS, Vec::new)?;
            orders.insert(0, order.clone());
            shipments.insert(0, shipment);

            tx.write(keys::ORDERS, &orders)?;
            tx.write(keys::SHIPMENTS, &shipments)?;
            if request.clear_cart {
                tx.remove(&keys::cart(user));
            }
            Ok::<_, ServiceError>(())
        })?;

        info!(order_id = %order.order_id, total = %order.total_amount, "Placed order");
        Ok(order)
    }

    /// Orders placed by `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get_user_orders(&self, user: &UserId) -> Result<Vec<Order>, ServiceError> {
        Ok(self
            .get_all_orders()?
            .into_iter()
            .filter(|o| o.user_id == *user)
            .collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, ServiceError> {
        Ok(self
            .get_all_orders()?
            .into_iter()
            .find(|o| o.order_id == *order_id))
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get_all_orders(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.docs.read(keys::ORDERS, Vec::new)?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the order has no shipment.
    pub fn get_shipment_by_order_id(&self, order_id: &OrderId) -> Result<Shipment, ServiceError> {
        self.get_all_shipments()?
            .into_iter()
            .find(|s| s.order_id == *order_id)
            .ok_or_else(|| ServiceError::NotFound(SHIPMENT_NOT_FOUND.to_string()))
    }

    /// Every shipment, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get_all_shipments(&self) -> Result<Vec<Shipment>, ServiceError> {
        Ok(self.docs.read(keys::SHIPMENTS, Vec::new)?)
    }

    /// Shipments attributed to `seller`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the backend fails.
    pub fn get_seller_shipments(&self, seller: &SellerId) -> Result<Vec<Shipment>, ServiceError> {
        Ok(self
            .get_all_shipments()?
            .into_iter()
            .filter(|s| s.seller_id.as_ref() == Some(seller))
            .collect())
    }

    /// Assign a carrier to an order's shipment.
    ///
    /// An existing shipment keeps its partner and tracking number unless a
    /// non-empty replacement is given. Without one, a new `Pending` shipment
    /// is created for the order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if there is neither a shipment nor
    /// an order with `order_id`.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub fn create_shipment(
        &self,
        order_id: &OrderId,
        logistics_partner: Option<String>,
        tracking_number: Option<String>,
    ) -> Result<Shipment, ServiceError> {
        let logistics_partner = non_blank(logistics_partner);
        let tracking_number = non_blank(tracking_number);

        self.docs.transaction(|tx| -> Result<Shipment, ServiceError> {
            let mut shipments: Vec<Shipment> = tx.read(keys::SHIPMENTS, Vec::new)?;

            if let Some(existing) = shipments.iter_mut().find(|s| s.order_id == *order_id) {
                if logistics_partner.is_some() {
                    existing.logistics_partner = logistics_partner;
                }
                if tracking_number.is_some() {
                    existing.tracking_number = tracking_number;
                }
                existing.shipped_at.get_or_insert_with(Utc::now);
                let updated = existing.clone();
                tx.write(keys::SHIPMENTS, &shipments)?;
                return Ok(updated);
            }

            let orders: Vec<Order> = tx.read(keys::ORDERS, Vec::new)?;
            let order = orders
                .iter()
                .find(|o| o.order_id == *order_id)
                .ok_or_else(|| ServiceError::NotFound(ORDER_NOT_FOUND.to_string()))?;

            let shipment = Shipment {
                shipment_id: ShipmentId::new(generate_id("SHP")),
                order_id: order_id.clone(),
                seller_id: order.items.iter().find_map(|i| i.seller_id.clone()),
                logistics_partner,
                tracking_number,
                status: ShipmentStatus::Pending,
                shipped_at: Some(Utc::now()),
                estimated_delivery: None,
            };
            shipments.insert(0, shipment.clone());
            tx.write(keys::SHIPMENTS, &shipments)?;
            info!(shipment_id = %shipment.shipment_id, "Created shipment");
            Ok(shipment)
        })
    }

    /// Move a shipment (and its order) to `status`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` for an unknown shipment and
    /// `ServiceError::InvalidTransition` if the move is not allowed.
    #[instrument(skip(self), fields(shipment_id = %shipment_id, status = %status))]
    pub fn update_shipment_status(
        &self,
        shipment_id: &ShipmentId,
        status: ShipmentStatus,
    ) -> Result<Shipment, ServiceError> {
        self.docs.transaction(|tx| -> Result<Shipment, ServiceError> {
            let mut shipments: Vec<Shipment> = tx.read(keys::SHIPMENTS, Vec::new)?;
            let shipment = shipments
                .iter_mut()
                .find(|s| s.shipment_id == *shipment_id)
                .ok_or_else(|| ServiceError::NotFound(SHIPMENT_NOT_FOUND.to_string()))?;

            if !shipment.status.can_transition_to(status) {
                return Err(ServiceError::InvalidTransition {
                    from: shipment.status,
                    to: status,
                });
            }

            shipment.status = status;
            shipment.shipped_at.get_or_insert_with(Utc::now);
            let updated = shipment.clone();

            let mut orders: Vec<Order> = tx.read(keys::ORDERS, Vec::new)?;
            if let Some(order) = orders.iter_mut().find(|o| o.order_id == updated.order_id) {
                order.status = status;
                tx.write(keys::ORDERS, &orders)?;
            }
            tx.write(keys::SHIPMENTS, &shipments)?;

            info!(order_id = %updated.order_id, "Updated shipment status");
            Ok(updated)
        })
    }
}

/// `{prefix}-{unix millis}-{0..100000}`.
fn generate_id(prefix: &str) -> String {
    let suffix: u32 = rand::rng().random_range(0..100_000);
    format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
