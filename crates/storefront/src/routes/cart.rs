//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use omnicart_core::{ProductId, UserId};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::coerce;
use crate::error::{AppError, Result};
use crate::models::CartView;
use crate::state::AppState;
use crate::store;

/// Add-to-cart body. `productId` and `quantity` may be numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub product_id: Value,
    pub quantity: Option<Value>,
}

/// Quantity update body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: Value,
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartView>> {
    Ok(Json(
        store::blocking(move || state.cart().get_cart(&user_id)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product_id = coerce::text(&body.product_id)
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest("productId is required".to_string()))?;
    let quantity = body.quantity.as_ref().and_then(coerce::count);

    Ok(Json(
        state
            .cart()
            .add_to_cart(&user_id, &product_id, quantity)
            .await?,
    ))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let quantity = coerce::count(&body.quantity)
        .ok_or_else(|| AppError::BadRequest("quantity must be a number".to_string()))?;
    Ok(Json(
        store::blocking(move || {
            state
                .cart()
                .update_quantity(&user_id, &product_id, quantity)
        })
        .await?,
    ))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
) -> Result<Json<CartView>> {
    Ok(Json(
        store::blocking(move || state.cart().remove_from_cart(&user_id, &product_id)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<CartView>> {
    Ok(Json(
        store::blocking(move || state.cart().clear_cart(&user_id)).await?,
    ))
}
