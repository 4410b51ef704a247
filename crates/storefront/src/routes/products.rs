//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use omnicart_core::{ProductId, SellerId};
use serde_json::Value;
use tracing::instrument;

use crate::catalog::ProductQuery;
use crate::error::{AppError, Result};
use crate::models::{DeleteOutcome, Product};
use crate::state::AppState;
use crate::store;

/// List products with optional search, filters, and sort.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_products(&query).await?))
}

/// Distinct category names.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().categories().await?))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .get_product(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = store::blocking(move || state.catalog().create_product(input)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<Value>,
) -> Result<Json<Product>> {
    Ok(Json(
        store::blocking(move || state.catalog().update_product(&id, input)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<DeleteOutcome>> {
    Ok(Json(
        store::blocking(move || state.catalog().delete_product(&id)).await?,
    ))
}

/// A seller's products. Unknown sellers get an empty list.
#[instrument(skip(state))]
pub async fn by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<SellerId>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list_by_seller(&seller_id, &query).await?))
}
