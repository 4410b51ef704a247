//! Wishlist route handlers.

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
use crate::models::{WishlistItem, WishlistMove};
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    #[serde(default)]
    pub product_id: Value,
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<WishlistItem>>> {
    Ok(Json(
        store::blocking(move || state.wishlist().get_wishlist(&user_id)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<Json<Vec<WishlistItem>>> {
    let product_id = coerce::text(&body.product_id)
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest("productId is required".to_string()))?;
    Ok(Json(
        state
            .wishlist()
            .add_to_wishlist(&user_id, &product_id)
            .await?,
    ))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
) -> Result<Json<Vec<WishlistItem>>> {
    Ok(Json(
        store::blocking(move || {
            state
                .wishlist()
                .remove_from_wishlist(&user_id, &product_id)
        })
        .await?,
    ))
}

#[instrument(skip(state))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
) -> Result<Json<WishlistMove>> {
    Ok(Json(
        state
            .wishlist()
            .move_to_cart(&user_id, &product_id)
            .await?,
    ))
}
