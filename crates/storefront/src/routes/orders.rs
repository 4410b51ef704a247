//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use omnicart_core::{OrderId, UserId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{Order, OrderRequest};
use crate::state::AppState;
use crate::store;

/// Place an order for the user in the path.
#[instrument(skip(state, request))]
pub async fn place(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = store::blocking(move || state.orders().place_order(&user_id, request)).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Order>> {
    store::blocking(move || state.orders().get_order_by_id(&order_id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

#[instrument(skip(state))]
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        store::blocking(move || state.orders().get_user_orders(&user_id)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        store::blocking(move || state.orders().get_all_orders()).await?,
    ))
}
