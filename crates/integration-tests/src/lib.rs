//! Shared fixtures for OmniCart integration tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p omnicart-integration-tests
//! ```
//!
//! Everything runs in-process: services sit on a [`MemoryStore`] or a
//! [`FileStore`] in a temp directory, the seed catalog is either static or
//! served by a throwaway local axum listener.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    routing::get,
};
use omnicart_storefront::catalog::SeedSource;
use omnicart_storefront::config::StorefrontConfig;
use omnicart_storefront::state::AppState;
use omnicart_storefront::store::{FileStore, KeyValueStore, MemoryStore};
use serde_json::{Value, json};
use tower::ServiceExt;

// =============================================================================
// Fixtures
// =============================================================================

/// Seed products with prices `[50, 150, 250]` and ratings `[2, 4, 5]`.
#[must_use]
pub fn seed_products() -> Vec<Value> {
    vec![
        json!({
            "id": 7,
            "title": "Canvas Tote",
            "description": "Everyday bag",
            "price": 50,
            "rating": 2,
            "stock": 12,
            "category": "bags",
            "thumbnail": "https://cdn.example.com/7.jpg",
            "meta": {"createdAt": "2024-01-01T00:00:00Z"}
        }),
        json!({
            "id": 8,
            "title": "Desk Lamp",
            "description": "Warm light",
            "price": 150,
            "rating": 4,
            "stock": 3,
            "category": "home-decoration",
            "meta": {"createdAt": "2024-03-01T00:00:00Z"}
        }),
        json!({
            "id": 9,
            "title": "Noise Cancelling Headphones",
            "description": "Over-ear",
            "price": 250,
            "rating": 5,
            "stock": 0,
            "category": "electronics",
            "meta": {"createdAt": "2024-02-01T00:00:00Z"}
        }),
    ]
}

/// Configuration with seed caching disabled.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        seed_cache_ttl: Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

/// State over a fresh in-memory store and the fixture seed.
#[must_use]
pub fn memory_state() -> AppState {
    state_over(Arc::new(MemoryStore::new()))
}

/// State over `store` and the fixture seed.
#[must_use]
pub fn state_over(store: Arc<dyn KeyValueStore>) -> AppState {
    AppState::with_seed(test_config(), store, SeedSource::Static(seed_products()))
}

/// State over a [`FileStore`] rooted at `dir` and the fixture seed.
#[must_use]
pub fn file_state(dir: &Path) -> AppState {
    state_over(Arc::new(FileStore::open(dir).unwrap()))
}

// =============================================================================
// HTTP helpers
// =============================================================================

/// Send one request through a fresh router and decode the JSON response.
///
/// Non-JSON bodies come back as a JSON string.
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app = omnicart_storefront::router(state.clone());

    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

// =============================================================================
// Seed server
// =============================================================================

/// Serve `{"products": products}` at `/products` on an ephemeral port.
///
/// Returns the URL to fetch.
pub async fn spawn_seed_server(products: Vec<Value>) -> String {
    let payload = json!({ "products": products });
    let app = Router::new().route(
        "/products",
        get(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    spawn(app).await
}

/// Serve a `500` at `/products` on an ephemeral port.
pub async fn spawn_failing_seed_server() -> String {
    let app = Router::new().route(
        "/products",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    spawn(app).await
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/products")
}

/// State over an in-memory store seeded from `url`.
#[must_use]
pub fn remote_state(url: String, cache_ttl: Duration) -> AppState {
    let config = StorefrontConfig {
        seed_url: url,
        seed_timeout: Duration::from_secs(5),
        seed_cache_ttl: cache_ttl,
        ..StorefrontConfig::default()
    };
    AppState::new(config, Arc::new(MemoryStore::new()))
}
