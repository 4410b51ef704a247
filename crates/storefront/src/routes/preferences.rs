//! Preference route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use omnicart_core::{ProductId, UserId};
use tracing::instrument;

use crate::error::Result;
use crate::models::{BrowseDefaults, Preferences, PreferencesUpdate, Product};
use crate::state::AppState;
use crate::store;

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Preferences>> {
    Ok(Json(
        store::blocking(move || state.preferences().get(&user_id)).await?,
    ))
}

#[instrument(skip(state, update))]
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>> {
    Ok(Json(
        store::blocking(move || state.preferences().update(&user_id, update)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn record_view(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
) -> Result<Json<Preferences>> {
    Ok(Json(
        store::blocking(move || state.preferences().record_view(&user_id, &product_id)).await?,
    ))
}

#[instrument(skip(state))]
pub async fn recently_viewed(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.preferences().recently_viewed(&user_id).await?))
}

/// Return the remembered category and sort, clearing them.
#[instrument(skip(state))]
pub async fn take_browse_defaults(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<BrowseDefaults>> {
    Ok(Json(
        store::blocking(move || state.preferences().take_browse_defaults(&user_id)).await?,
    ))
}
