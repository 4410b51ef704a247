//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Health check
//!
//! # Products
//! GET    /api/products                           - Listing (search, filters, sort)
//! POST   /api/products                           - Create local product
//! GET    /api/products/categories                - Distinct categories
//! GET    /api/products/{id}                      - Product detail
//! PUT    /api/products/{id}                      - Replace / override
//! DELETE /api/products/{id}                      - Delete (tombstone)
//!
//! # Sellers
//! GET    /api/sellers/{seller_id}/products       - Seller catalog
//! GET    /api/sellers/{seller_id}/shipments      - Seller shipments
//!
//! # Cart
//! GET    /api/cart/{user_id}                     - Cart with totals
//! POST   /api/cart/{user_id}                     - Add item
//! DELETE /api/cart/{user_id}                     - Clear
//! PUT    /api/cart/{user_id}/{product_id}        - Set quantity
//! DELETE /api/cart/{user_id}/{product_id}        - Remove item
//!
//! # Wishlist
//! GET    /api/wishlist/{user_id}
//! POST   /api/wishlist/{user_id}
//! DELETE /api/wishlist/{user_id}/{product_id}
//! POST   /api/wishlist/{user_id}/{product_id}/move-to-cart
//!
//! # Orders
//! GET    /api/orders                             - All orders
//! POST   /api/orders/{user_id}                   - Place order
//! GET    /api/orders/{order_id}                  - Order detail
//! GET    /api/orders/user/{user_id}              - A user's orders
//!
//! # Shipments
//! GET    /api/shipments
//! POST   /api/shipments                          - Create / assign carrier
//! GET    /api/shipments/order/{order_id}
//! PUT    /api/shipments/{shipment_id}/status
//!
//! # Ads
//! GET    /api/ads                                - `?enabled=true` for live ads
//! POST   /api/ads
//! PUT    /api/ads/{id}
//! DELETE /api/ads/{id}
//!
//! # Preferences
//! GET    /api/preferences/{user_id}
//! PUT    /api/preferences/{user_id}
//! POST   /api/preferences/{user_id}/viewed/{product_id}
//! GET    /api/preferences/{user_id}/recently-viewed
//! DELETE /api/preferences/{user_id}/browse-defaults
//! ```

pub mod ads;
pub mod cart;
pub mod orders;
pub mod preferences;
pub mod products;
pub mod shipments;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/categories", get(products::categories))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the seller routes router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/{seller_id}/products", get(products::by_seller))
        .route("/{seller_id}/shipments", get(shipments::by_seller))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}",
            get(cart::show).post(cart::add).delete(cart::clear),
        )
        .route(
            "/{user_id}/{product_id}",
            put(cart::update).delete(cart::remove),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", get(wishlist::show).post(wishlist::add))
        .route(
            "/{user_id}/{product_id}",
            axum::routing::delete(wishlist::remove),
        )
        .route(
            "/{user_id}/{product_id}/move-to-cart",
            post(wishlist::move_to_cart),
        )
}

/// Create the order routes router.
///
/// `POST /{id}` takes a user id and `GET /{id}` an order id; they share one
/// path pattern.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show).post(orders::place))
        .route("/user/{user_id}", get(orders::by_user))
}

/// Create the shipment routes router.
pub fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shipments::index).post(shipments::create))
        .route("/order/{order_id}", get(shipments::by_order))
        .route("/{shipment_id}/status", put(shipments::update_status))
}

/// Create the ad routes router.
pub fn ad_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ads::index).post(ads::create))
        .route("/{id}", put(ads::update).delete(ads::delete))
}

/// Create the preference routes router.
pub fn preference_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}",
            get(preferences::show).put(preferences::update),
        )
        .route(
            "/{user_id}/viewed/{product_id}",
            post(preferences::record_view),
        )
        .route(
            "/{user_id}/recently-viewed",
            get(preferences::recently_viewed),
        )
        .route(
            "/{user_id}/browse-defaults",
            axum::routing::delete(preferences::take_browse_defaults),
        )
}

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/sellers", seller_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/orders", order_routes())
        .nest("/shipments", shipment_routes())
        .nest("/ads", ad_routes())
        .nest("/preferences", preference_routes())
}
