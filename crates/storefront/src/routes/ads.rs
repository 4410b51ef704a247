//! Ad route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use omnicart_core::AdId;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::Result;
use crate::models::{Ad, AdInput, AdPatch};
use crate::state::AppState;
use crate::store;

#[derive(Debug, Default, Deserialize)]
pub struct AdFilter {
    #[serde(default)]
    pub enabled: bool,
}

/// All ads, or only enabled ones with `?enabled=true`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<AdFilter>,
) -> Result<Json<Vec<Ad>>> {
    let ads = store::blocking(move || {
        if filter.enabled {
            state.ads().enabled_ads()
        } else {
            state.ads().list_ads()
        }
    })
    .await?;
    Ok(Json(ads))
}

#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<AdInput>,
) -> Result<(StatusCode, Json<Ad>)> {
    let ad = store::blocking(move || state.ads().create_ad(input)).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

#[instrument(skip(state, patch))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<AdId>,
    Json(patch): Json<AdPatch>,
) -> Result<Json<Ad>> {
    Ok(Json(
        store::blocking(move || state.ads().update_ad(&id, patch)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<AdId>) -> Result<Json<Value>> {
    store::blocking(move || state.ads().delete_ad(&id)).await?;
    Ok(Json(json!({ "success": true })))
}
