//! Remote seed catalog over a local HTTP listener.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::{Method, StatusCode};
use omnicart_core::ProductId;
use omnicart_integration_tests::{
    remote_state, seed_products, send, spawn_failing_seed_server, spawn_seed_server,
};
use omnicart_storefront::catalog::{CatalogError, ProductQuery};
use serde_json::json;

#[tokio::test]
async fn test_remote_seed_is_normalized() {
    let url = spawn_seed_server(seed_products()).await;
    let state = remote_state(url, Duration::ZERO);

    let products = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap();
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Canvas Tote", "Desk Lamp", "Noise Cancelling Headphones"]
    );
}

#[tokio::test]
async fn test_tombstone_hides_refetched_product() {
    let url = spawn_seed_server(seed_products()).await;
    let state = remote_state(url, Duration::from_secs(300));

    state.catalog().delete_product(&ProductId::new("7")).unwrap();
    state.catalog().seed().invalidate().await;

    let products = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap();
    assert!(products.iter().all(|p| p.id.as_str() != "7"));
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_payload_without_products_is_empty() {
    let url = spawn_seed_server(Vec::new()).await;
    let state = remote_state(url, Duration::ZERO);

    state
        .catalog()
        .create_product(json!({"name": "Only Local"}))
        .unwrap();
    let products = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_upstream_failure() {
    let url = spawn_failing_seed_server().await;
    let state = remote_state(url, Duration::from_secs(300));

    let err = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Status(500)));

    let (status, body) = send(&state, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Failed to fetch products"}));
}

#[tokio::test]
async fn test_cart_add_survives_upstream_failure() {
    let url = spawn_failing_seed_server().await;
    let state = remote_state(url, Duration::ZERO);

    let (status, cart) = send(
        &state,
        Method::POST,
        "/api/cart/u1",
        Some(json!({"productId": "7"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["quantity"], 1);
    assert_eq!(cart["items"][0]["name"], "");
}
