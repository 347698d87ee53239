//! End-to-end tests for the catalog-to-cart-to-order pipeline.
//!
//! Each test runs a real storefront over HTTP against in-process mock
//! collaborators; no external service is touched.

use axum::http::StatusCode;
use serde_json::json;

use sheetstall_integration_tests::{MockFeed, MockOrders, TestContext, gviz_document};

// ============================================================================
// Catalog & grid
// ============================================================================

#[tokio::test]
async fn test_grid_renders_loaded_catalog() {
    let ctx = TestContext::new().await;

    let grid = ctx.get("/products").await;
    assert!(grid.contains("Widget"));
    assert!(grid.contains("Gadget"));
    assert!(grid.contains("$9.99"));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let ctx = TestContext::new().await;

    let grid = ctx.get("/products?q=WIDGET").await;
    assert!(grid.contains("Widget"));
    assert!(!grid.contains("Gadget"));
}

#[tokio::test]
async fn test_search_narrows_to_zero_results_without_error() {
    let ctx = TestContext::new().await;

    let grid = ctx.get("/products?q=no+such+thing").await;
    assert!(grid.contains("No products found."));
}

#[tokio::test]
async fn test_category_filter_is_exact() {
    let ctx = TestContext::new().await;

    let grid = ctx.get("/products?category=Gizmos").await;
    assert!(grid.contains("Gadget"));
    assert!(!grid.contains("Widget"));
}

#[tokio::test]
async fn test_home_lists_discovered_categories() {
    let ctx = TestContext::new().await;

    let home = ctx.get("/").await;
    assert!(home.contains("Tools"));
    assert!(home.contains("Gizmos"));
}

#[tokio::test]
async fn test_refresh_replaces_catalog_wholesale() {
    let ctx = TestContext::new().await;

    ctx.feed.set_document(&gviz_document(&[
        &["id", "name", "category", "price", "desc", "img"],
        &["9", "Mug", "Kitchen", "4.50", "Holds coffee", ""],
    ]));

    let response = ctx.post_form("/catalog/refresh", &[]).await;
    let body = response.text().await.expect("refresh body");
    assert!(body.contains("Mug"));
    assert!(!body.contains("Widget"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_catalog() {
    let ctx = TestContext::new().await;

    ctx.feed.set_raw("garbage");
    let response = ctx.post_form("/catalog/refresh", &[]).await;
    let body = response.text().await.expect("refresh body");

    // Failure is visible, previous catalog still renders.
    assert!(body.contains("Failed to load products."));
    assert!(body.contains("Widget"));
    assert!(ctx.get("/products").await.contains("Widget"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_to_cart_updates_badge_and_panel() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form("/cart/add", &[("id", "1"), ("quantity", "2")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );

    let panel = ctx.get("/cart").await;
    assert!(panel.contains("Widget"));
    assert!(panel.contains("$19.98"));
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_lines() {
    let ctx = TestContext::new().await;

    ctx.post_form("/cart/add", &[("id", "1"), ("quantity", "2")])
        .await;
    ctx.post_form("/cart/add", &[("id", "1"), ("quantity", "2")])
        .await;

    let count = ctx.get("/cart/count").await;
    assert!(count.contains("4"));
    // One line, not two.
    assert_eq!(ctx.get("/cart").await.matches("cart-item").count(), 1);
}

#[tokio::test]
async fn test_quantity_updates_are_clamped() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "1")]).await;

    ctx.post_form("/cart/update", &[("id", "1"), ("quantity", "5000")])
        .await;
    assert!(ctx.get("/cart/count").await.contains("999"));

    ctx.post_form("/cart/update", &[("id", "1"), ("quantity", "-3")])
        .await;
    assert!(ctx.get("/cart/count").await.contains(">1<"));
}

#[tokio::test]
async fn test_remove_empties_cart() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "1"), ("quantity", "2")])
        .await;

    ctx.post_form("/cart/remove", &[("id", "1")]).await;

    let panel = ctx.get("/cart").await;
    assert!(panel.contains("Your cart is empty."));
    assert!(panel.contains("$0.00"));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.post_form("/cart/add", &[("id", "missing")]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(ctx.get("/cart").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_cart_survives_a_catalog_reload() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "1"), ("quantity", "3")])
        .await;

    // The product disappears from the feed entirely.
    ctx.feed.set_document(&gviz_document(&[
        &["id", "name", "category", "price", "desc", "img"],
        &["9", "Mug", "Kitchen", "4.50", "Holds coffee", ""],
    ]));
    ctx.post_form("/catalog/refresh", &[]).await;

    // The line still renders from its snapshot.
    let panel = ctx.get("/cart").await;
    assert!(panel.contains("Widget"));
    assert!(panel.contains("$29.97"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_submits_order_and_clears_cart() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "1"), ("quantity", "2")])
        .await;

    let response = ctx
        .post_form("/checkout", &[("name", "Ada"), ("contact", "555-0100")])
        .await;
    let body = response.text().await.expect("checkout body");
    assert!(body.contains("Order sent!"));

    // The endpoint saw exactly one order with the expected shape.
    let received = ctx.orders.received();
    assert_eq!(received.len(), 1);
    let order = &received[0];
    assert_eq!(order["customerName"], "Ada");
    assert_eq!(order["customerContact"], "555-0100");
    assert_eq!(order["items"][0]["id"], "1");
    assert_eq!(order["items"][0]["qty"], 2);
    assert_eq!(order["subtotal"], "19.98");
    assert!(order["timestamp"].is_string());

    // Success cleared the cart.
    assert!(ctx.get("/cart").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_checkout_with_empty_cart_makes_no_request() {
    let ctx = TestContext::new().await;

    let response = ctx.post_form("/checkout", &[("name", "Ada")]).await;
    let body = response.text().await.expect("checkout body");

    assert!(body.contains("Cart is empty."));
    assert!(ctx.orders.received().is_empty());
}

#[tokio::test]
async fn test_checkout_without_name_preserves_cart() {
    let ctx = TestContext::new().await;
    ctx.post_form("/cart/add", &[("id", "2")]).await;

    let response = ctx.post_form("/checkout", &[("name", "  ")]).await;
    let body = response.text().await.expect("checkout body");

    assert!(body.contains("Please enter your name."));
    assert!(ctx.orders.received().is_empty());
    assert!(ctx.get("/cart").await.contains("Gadget"));
}

#[tokio::test]
async fn test_endpoint_failure_preserves_cart_for_retry() {
    let orders = MockOrders::start(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let ctx = TestContext::with_orders(orders).await;
    ctx.post_form("/cart/add", &[("id", "1"), ("quantity", "2")])
        .await;

    let response = ctx.post_form("/checkout", &[("name", "Ada")]).await;
    let body = response.text().await.expect("checkout body");
    assert!(body.contains("Failed to send order."));

    // Line items are still present afterwards.
    let panel = ctx.get("/cart").await;
    assert!(panel.contains("Widget"));
    assert!(panel.contains("$19.98"));
}

#[tokio::test]
async fn test_rejecting_status_preserves_cart() {
    let orders = MockOrders::start(StatusCode::OK, json!({ "status": "queue-full" })).await;
    let ctx = TestContext::with_orders(orders).await;
    ctx.post_form("/cart/add", &[("id", "1")]).await;

    let response = ctx.post_form("/checkout", &[("name", "Ada")]).await;
    let body = response.text().await.expect("checkout body");

    assert!(body.contains("Failed to send order."));
    assert!(ctx.get("/cart").await.contains("Widget"));
}

#[tokio::test]
async fn test_rows_without_ids_get_generated_ones_and_still_sell() {
    let feed = MockFeed::start(&gviz_document(&[
        &["id", "name", "category", "price", "desc", "img"],
        &["", "Mystery Box", "Misc", "15", "Contents unknown", ""],
    ]))
    .await;
    let ctx = TestContext::with_collaborators(feed, MockOrders::accepting().await).await;

    // The generated id is only discoverable from the rendered grid.
    let grid = ctx.get("/products").await;
    assert!(grid.contains("Mystery Box"));
    let id = grid
        .split("data-id=\"")
        .nth(1)
        .and_then(|s| s.split('"').next())
        .expect("a product card with an id")
        .to_string();
    assert!(!id.is_empty());

    // The whole pipeline works against the generated id.
    ctx.post_form("/cart/add", &[("id", &id), ("quantity", "1")])
        .await;
    let response = ctx.post_form("/checkout", &[("name", "Ada")]).await;
    assert!(
        response
            .text()
            .await
            .expect("checkout body")
            .contains("Order sent!")
    );
    assert_eq!(ctx.orders.received()[0]["items"][0]["id"], id.as_str());
}
