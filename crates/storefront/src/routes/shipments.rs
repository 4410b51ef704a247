//! Shipment route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use omnicart_core::{OrderId, SellerId, ShipmentId, ShipmentStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::Shipment;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub order_id: OrderId,
    pub logistics_partner: Option<String>,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Shipment>>> {
    Ok(Json(
        store::blocking(move || state.orders().get_all_shipments()).await?,
    ))
}

/// Create a shipment, or update the carrier on an existing one.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateShipmentRequest>,
) -> Result<Json<Shipment>> {
    Ok(Json(
        store::blocking(move || {
            state.orders().create_shipment(
                &body.order_id,
                body.logistics_partner,
                body.tracking_number,
            )
        })
        .await?,
    ))
}

#[instrument(skip(state))]
pub async fn by_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Shipment>> {
    Ok(Json(
        store::blocking(move || state.orders().get_shipment_by_order_id(&order_id)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(shipment_id): Path<ShipmentId>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Shipment>> {
    let status: ShipmentStatus = body
        .status
        .parse()
        .map_err(|e: omnicart_core::ParseStatusError| AppError::BadRequest(e.to_string()))?;
    Ok(Json(
        store::blocking(move || state.orders().update_shipment_status(&shipment_id, status))
            .await?,
    ))
}

/// A seller's shipments. Unknown sellers get an empty list.
#[instrument(skip(state))]
pub async fn by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<SellerId>,
) -> Result<Json<Vec<Shipment>>> {
    Ok(Json(
        store::blocking(move || state.orders().get_seller_shipments(&seller_id)).await?,
    ))
}
