//! Service-level behaviour of the storefront.
//!
//! Each section drives the services the way the HTTP handlers do, over an
//! in-memory store unless the scenario is about persistence.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use omnicart_core::{OrderId, ProductId, SellerId, ShipmentId, ShipmentStatus, UserId};
use omnicart_integration_tests::{file_state, memory_state, state_over};
use omnicart_storefront::catalog::ProductQuery;
use omnicart_storefront::models::{OrderItemInput, OrderRequest};
use omnicart_storefront::services::ServiceError;
use omnicart_storefront::store::{Batch, FileStore, KeyValueStore, MemoryStore, keys};
use rust_decimal::Decimal;
use serde_json::json;

fn ids(products: &[omnicart_storefront::models::Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

fn single_item_order(product_id: &str, price: i64) -> OrderRequest {
    OrderRequest {
        items: vec![OrderItemInput::new(product_id, 1, Decimal::from(price))],
        ..OrderRequest::default()
    }
}

// =============================================================================
// Wishlist
// =============================================================================

#[tokio::test]
async fn test_wishlist_add_is_idempotent() {
    let state = memory_state();
    let user = UserId::new("u1");
    let product = ProductId::new("7");

    let once = state.wishlist().add_to_wishlist(&user, &product).await.unwrap();
    let twice = state.wishlist().add_to_wishlist(&user, &product).await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.len(), 1);
    assert_eq!(twice.first().unwrap().name, "Canvas Tote");
}

#[tokio::test]
async fn test_move_to_cart_transfers_the_item() {
    let state = memory_state();
    let user = UserId::new("u1");
    let product = ProductId::new("8");

    state.wishlist().add_to_wishlist(&user, &product).await.unwrap();
    let moved = state.wishlist().move_to_cart(&user, &product).await.unwrap();

    assert!(moved.wishlist.is_empty());
    assert_eq!(moved.cart.items.len(), 1);
    assert_eq!(state.cart().get_cart(&user).unwrap(), moved.cart);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_quantities_accumulate() {
    let state = memory_state();
    let user = UserId::new("u1");
    let product = ProductId::new("7");

    state.cart().add_to_cart(&user, &product, Some(2)).await.unwrap();
    let cart = state.cart().add_to_cart(&user, &product, Some(3)).await.unwrap();

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items.first().unwrap().quantity, 5);
    assert_eq!(cart.subtotal, Decimal::from(250));
}

#[tokio::test]
async fn test_cart_add_for_unknown_product_keeps_empty_snapshot() {
    let state = memory_state();
    let user = UserId::new("u1");

    let cart = state
        .cart()
        .add_to_cart(&user, &ProductId::new("nope"), None)
        .await
        .unwrap();

    let item = cart.items.first().unwrap();
    assert_eq!(item.quantity, 1);
    assert_eq!(item.price, Decimal::ZERO);
    assert!(item.name.is_empty());
}

#[tokio::test]
async fn test_concurrent_adds_are_not_lost() {
    let state = memory_state();
    let user = UserId::new("u1");
    let product = ProductId::new("7");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let state = state.clone();
        let user = user.clone();
        let product = product.clone();
        handles.push(tokio::spawn(async move {
            state.cart().add_to_cart(&user, &product, Some(1)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let cart = state.cart().get_cart(&user).unwrap();
    assert_eq!(cart.items.first().unwrap().quantity, 10);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_override_shadows_seed_product() {
    let state = memory_state();

    state
        .catalog()
        .update_product(&ProductId::new("7"), json!({"name": "X"}))
        .unwrap();
    let products = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap();

    let sevens: Vec<_> = products.iter().filter(|p| p.id.as_str() == "7").collect();
    assert_eq!(sevens.len(), 1);
    assert_eq!(sevens.first().unwrap().name, "X");
    assert_eq!(ids(&products), vec!["7", "8", "9"]);
}

#[tokio::test]
async fn test_tombstone_survives_refetch() {
    let state = memory_state();

    state.catalog().delete_product(&ProductId::new("7")).unwrap();
    state.catalog().seed().invalidate().await;

    let products = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap();
    assert_eq!(ids(&products), vec!["8", "9"]);
    assert!(
        state
            .catalog()
            .get_product(&ProductId::new("7"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_filters_compose_by_intersection() {
    let state = memory_state();
    let catalog = state.catalog();

    let by_price = ProductQuery::default().min_price("100").max_price("200");
    let products = catalog.list_products(&by_price).await.unwrap();
    assert_eq!(ids(&products), vec!["8"]);

    let by_rating = ProductQuery::default().min_rating("4");
    let products = catalog.list_products(&by_rating).await.unwrap();
    assert_eq!(ids(&products), vec!["8", "9"]);

    let both = by_price.min_rating("5");
    assert!(catalog.list_products(&both).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_sort_keeps_merge_order() {
    let state = memory_state();
    let catalog = state.catalog();

    state
        .catalog()
        .create_product(json!({"name": "Local Mug", "price": 9}))
        .unwrap();

    let unsorted = catalog.list_products(&ProductQuery::default()).await.unwrap();
    let bogus = catalog
        .list_products(&ProductQuery::default().sort("bogus"))
        .await
        .unwrap();
    assert_eq!(bogus, unsorted);
    assert_eq!(bogus.len(), 4);
}

#[tokio::test]
async fn test_sorts() {
    let state = memory_state();
    let catalog = state.catalog();

    let cheapest = catalog
        .list_products(&ProductQuery::default().sort("price_asc"))
        .await
        .unwrap();
    assert_eq!(ids(&cheapest), vec!["7", "8", "9"]);

    let newest = catalog
        .list_products(&ProductQuery::default().sort(" NEWEST "))
        .await
        .unwrap();
    assert_eq!(ids(&newest), vec!["8", "9", "7"]);
}

#[tokio::test]
async fn test_seller_filter_without_matches_is_empty() {
    let state = memory_state();

    let products = state
        .catalog()
        .list_by_seller(&SellerId::new("nobody"), &ProductQuery::default())
        .await
        .unwrap();
    assert!(products.is_empty());

    let shipments = state
        .orders()
        .get_seller_shipments(&SellerId::new("nobody"))
        .unwrap();
    assert!(shipments.is_empty());
}

// =============================================================================
// Orders & shipments
// =============================================================================

#[test]
fn test_order_is_paired_with_pending_shipment() {
    let state = memory_state();
    let user = UserId::new("u1");

    let order = state
        .orders()
        .place_order(&user, single_item_order("7", 100))
        .unwrap();
    assert_eq!(order.total_amount, Decimal::from(100));

    let shipment = state
        .orders()
        .get_shipment_by_order_id(&order.order_id)
        .unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Pending);
    assert_eq!(shipment.order_id, order.order_id);
}

#[tokio::test]
async fn test_order_can_clear_cart_in_same_write() {
    let state = memory_state();
    let user = UserId::new("u1");
    state
        .cart()
        .add_to_cart(&user, &ProductId::new("7"), Some(1))
        .await
        .unwrap();

    let request = OrderRequest {
        clear_cart: true,
        ..single_item_order("7", 50)
    };
    state.orders().place_order(&user, request).unwrap();

    assert!(state.cart().get_cart(&user).unwrap().items.is_empty());
    assert_eq!(state.orders().get_user_orders(&user).unwrap().len(), 1);
}

#[test]
fn test_backwards_status_move_is_rejected() {
    let state = memory_state();
    let order = state
        .orders()
        .place_order(&UserId::new("u1"), single_item_order("7", 100))
        .unwrap();
    let shipment = state
        .orders()
        .get_shipment_by_order_id(&order.order_id)
        .unwrap();

    state
        .orders()
        .update_shipment_status(&shipment.shipment_id, ShipmentStatus::Shipped)
        .unwrap();
    state
        .orders()
        .update_shipment_status(&shipment.shipment_id, ShipmentStatus::Delivered)
        .unwrap();

    let err = state
        .orders()
        .update_shipment_status(&shipment.shipment_id, ShipmentStatus::Pending)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidTransition {
            from: ShipmentStatus::Delivered,
            to: ShipmentStatus::Pending,
        }
    ));

    let after = state
        .orders()
        .get_shipment_by_order_id(&order.order_id)
        .unwrap();
    assert_eq!(after.status, ShipmentStatus::Delivered);
    let order = state.orders().get_order_by_id(&order.order_id).unwrap().unwrap();
    assert_eq!(order.status, ShipmentStatus::Delivered);
}

#[test]
fn test_unknown_shipment_is_not_found() {
    let state = memory_state();

    let err = state
        .orders()
        .update_shipment_status(&ShipmentId::new("SHP-0-0"), ShipmentStatus::Shipped)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Shipment not found"));

    let err = state
        .orders()
        .create_shipment(&OrderId::new("ORD-0-0"), Some("DHL".into()), None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn test_create_shipment_keeps_existing_values_for_blank_input() {
    let state = memory_state();
    let order = state
        .orders()
        .place_order(&UserId::new("u1"), single_item_order("7", 100))
        .unwrap();

    state
        .orders()
        .create_shipment(&order.order_id, Some("BlueDart".into()), Some("TRK1".into()))
        .unwrap();
    let shipment = state
        .orders()
        .create_shipment(&order.order_id, Some("Delhivery".into()), Some("  ".into()))
        .unwrap();

    assert_eq!(shipment.logistics_partner.as_deref(), Some("Delhivery"));
    assert_eq!(shipment.tracking_number.as_deref(), Some("TRK1"));
    assert!(shipment.shipped_at.is_some());
    assert_eq!(state.orders().get_all_shipments().unwrap().len(), 1);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_pending_journal_completes_order_on_reopen() {
    // Produce the exact batch an order placement commits
    let memory = Arc::new(MemoryStore::new());
    let state = state_over(memory.clone());
    let order = state
        .orders()
        .place_order(&UserId::new("u1"), single_item_order("7", 100))
        .unwrap();

    let mut batch = Batch::new();
    for key in [keys::ORDERS, keys::SHIPMENTS] {
        batch = batch.set(key, memory.get(key).unwrap().unwrap());
    }

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(FileStore::JOURNAL_FILE),
        serde_json::to_vec(&batch).unwrap(),
    )
    .unwrap();

    let reopened = file_state(dir.path());
    assert!(
        reopened
            .orders()
            .get_order_by_id(&order.order_id)
            .unwrap()
            .is_some()
    );
    let shipment = reopened
        .orders()
        .get_shipment_by_order_id(&order.order_id)
        .unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Pending);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let user = UserId::new("u1");
    {
        let state = file_state(dir.path());
        state
            .cart()
            .add_to_cart(&user, &ProductId::new("9"), Some(2))
            .await
            .unwrap();
        state.catalog().delete_product(&ProductId::new("8")).unwrap();
    }

    let state = file_state(dir.path());
    let cart = state.cart().get_cart(&user).unwrap();
    assert_eq!(cart.items.first().unwrap().quantity, 2);
    let products = state
        .catalog()
        .list_products(&ProductQuery::default())
        .await
        .unwrap();
    assert_eq!(ids(&products), vec!["7", "9"]);
}

#[test]
fn test_corrupt_documents_read_as_default() {
    let user = UserId::new("u1");
    let store = MemoryStore::with_entries([
        (keys::cart(&user), "{not json".to_string()),
        (
            keys::ORDERS.to_string(),
            r#"{"version":1,"data":"oops"}"#.to_string(),
        ),
    ]);
    let state = state_over(Arc::new(store));

    assert!(state.cart().get_cart(&user).unwrap().items.is_empty());
    assert!(state.orders().get_all_orders().unwrap().is_empty());
}

#[test]
fn test_one_bad_legacy_order_does_not_hide_or_erase_the_rest() {
    let legacy = json!([
        {"orderId": "ORD-1", "userId": "u1", "orderDate": "2024-01-01T00:00:00Z", "totalAmount": "10"},
        {"orderId": "ORD-2", "userId": "u1", "orderDate": "2024-01-02T00:00:00Z", "totalAmount": null}
    ]);
    let memory = Arc::new(MemoryStore::with_entries([(
        keys::ORDERS.to_string(),
        legacy.to_string(),
    )]));
    let state = state_over(memory.clone());

    let listed = state.orders().get_all_orders().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().unwrap().order_id, OrderId::new("ORD-1"));

    let placed = state
        .orders()
        .place_order(&UserId::new("u2"), single_item_order("7", 20))
        .unwrap();

    let raw = memory.get(keys::ORDERS).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let order_ids: Vec<&str> = stored["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["orderId"].as_str().unwrap())
        .collect();
    assert_eq!(order_ids, vec![placed.order_id.as_str(), "ORD-1", "ORD-2"]);
    assert_eq!(stored["data"][2]["totalAmount"], serde_json::Value::Null);
}

#[test]
fn test_newer_documents_are_never_overwritten() {
    let newer = r#"{"version":2,"data":{"shipments":[]}}"#;
    let memory = Arc::new(MemoryStore::with_entries([(
        keys::SHIPMENTS.to_string(),
        newer.to_string(),
    )]));
    let state = state_over(memory.clone());

    assert!(state.orders().get_all_shipments().unwrap().is_empty());
    let err = state
        .orders()
        .place_order(&UserId::new("u1"), single_item_order("7", 20))
        .unwrap_err();

    assert!(matches!(err, ServiceError::Store(_)));
    assert_eq!(memory.get(keys::SHIPMENTS).unwrap().as_deref(), Some(newer));
    assert!(memory.get(keys::ORDERS).unwrap().is_none());

    let report = state.docs().migrate_all().unwrap();
    assert_eq!(report.skipped, vec![keys::SHIPMENTS.to_string()]);
    assert_eq!(memory.get(keys::SHIPMENTS).unwrap().as_deref(), Some(newer));
}

#[tokio::test]
async fn test_extreme_prices_never_panic() {
    let state = memory_state();
    let user = UserId::new("u1");
    let huge = json!({"name": "Vault", "price": Decimal::MAX.to_string()});

    assert!(state.catalog().create_product(huge.clone()).is_err());
    assert!(state
        .catalog()
        .update_product(&ProductId::new("7"), huge)
        .is_err());

    let order = OrderRequest {
        items: vec![OrderItemInput::new("7", 2, Decimal::MAX)],
        ..OrderRequest::default()
    };
    assert!(matches!(
        state.orders().place_order(&user, order),
        Err(ServiceError::Amount(_))
    ));

    // A legacy cart line priced at the limit cannot be grown past it
    state
        .docs()
        .store()
        .set(
            &keys::cart(&user),
            json!([{"productId": "7", "quantity": 1, "price": Decimal::MAX.to_string()}])
                .to_string(),
        )
        .unwrap();
    assert!(matches!(
        state.cart().add_to_cart(&user, &ProductId::new("7"), None).await,
        Err(ServiceError::Amount(_))
    ));
    assert_eq!(state.cart().get_cart(&user).unwrap().subtotal, Decimal::MAX);
}

#[test]
fn test_legacy_documents_are_read_and_migrated() {
    let user = UserId::new("u1");
    let memory = Arc::new(MemoryStore::with_entries([(
        keys::cart(&user),
        r#"[{"productId": 7, "quantity": 2, "price": 50, "name": "Canvas Tote"}]"#.to_string(),
    )]));
    let state = state_over(memory.clone());

    let cart = state.cart().get_cart(&user).unwrap();
    let item = cart.items.first().unwrap();
    assert_eq!(item.product_id, ProductId::new("7"));
    assert_eq!(item.price, Decimal::from(50));

    let report = state.docs().migrate_all().unwrap();
    assert_eq!(report.rewritten, vec![keys::cart(&user)]);
    let raw = memory.get(&keys::cart(&user)).unwrap().unwrap();
    assert!(raw.starts_with(r#"{"version":1"#));
}

// =============================================================================
// Ads & preferences
// =============================================================================

#[test]
fn test_default_ads_are_seeded_once() {
    let state = memory_state();

    let ads = state.ads().list_ads().unwrap();
    assert_eq!(ads.len(), 3);

    let first = ads.first().unwrap().id.clone();
    state.ads().delete_ad(&first).unwrap();
    assert_eq!(state.ads().list_ads().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recently_viewed_resolves_products() {
    let state = memory_state();
    let user = UserId::new("u1");

    for id in ["7", "gone", "9", "7"] {
        state
            .preferences()
            .record_view(&user, &ProductId::new(id))
            .unwrap();
    }

    let viewed = state.preferences().recently_viewed(&user).await.unwrap();
    assert_eq!(ids(&viewed), vec!["7", "9"]);
}

#[test]
fn test_browse_defaults_are_taken_once() {
    let state = memory_state();
    let user = UserId::new("u1");

    state
        .preferences()
        .set_browse_defaults(&user, Some("bags".into()), Some("price_asc".into()))
        .unwrap();

    let taken = state.preferences().take_browse_defaults(&user).unwrap();
    assert_eq!(taken.category.as_deref(), Some("bags"));
    assert_eq!(taken.sort.as_deref(), Some("price_asc"));

    let again = state.preferences().take_browse_defaults(&user).unwrap();
    assert!(again.category.is_none());
    assert!(again.sort.is_none());
}
