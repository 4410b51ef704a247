//! OmniCart storefront library.
//!
//! Commerce services (catalog, cart, wishlist, orders and shipments, ads,
//! preferences) over a pluggable key-value store, plus the axum router that
//! exposes them as a JSON API. The `omnicart-storefront` binary serves this
//! router; the `omnicart` CLI drives the same services directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod coerce;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router with tracing, request ids, and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
