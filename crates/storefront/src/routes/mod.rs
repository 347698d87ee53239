//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Storefront page (grid, cart panel, checkout form)
//! GET  /health            - Health check
//!
//! # Catalog
//! GET  /products          - Product grid fragment (q, category query params)
//! POST /catalog/refresh   - Re-fetch the feed and replace the catalog
//!
//! # Cart (HTMX fragments)
//! GET  /cart              - Cart panel fragment
//! GET  /cart/count        - Cart count badge fragment
//! POST /cart/add          - Add to cart (returns badge, triggers cart-updated)
//! POST /cart/update       - Update line quantity (returns cart panel)
//! POST /cart/remove       - Remove line (returns cart panel)
//!
//! # Checkout
//! POST /checkout          - Validate and submit the order
//! ```
//!
//! Every state-changing intent maps to exactly one store call, and every
//! mutation response fires a `cart-updated` trigger so stale fragments
//! refresh themselves.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::grid))
        .route("/catalog/refresh", post(products::refresh))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::panel))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Storefront page
        .route("/", get(home::home))
        // Catalog routes
        .merge(catalog_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::submit))
}
