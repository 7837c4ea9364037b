//! Supplier marketplace over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use inventrak_integration_tests::TestContext;
use serde_json::json;

async fn admin() -> TestContext {
    let ctx = TestContext::new();
    ctx.login_as("admin").await;
    ctx
}

#[tokio::test]
async fn test_browse_and_filter() {
    let ctx = admin().await;
    let (status, body) = ctx.get("/marketplace/listings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["listings"].as_array().unwrap().len(), 6);
    assert_eq!(body["categories"][0], "all");

    let (_, body) = ctx.get("/marketplace/listings?category=Snacks").await;
    assert_eq!(body["listings"].as_array().unwrap().len(), 1);

    let (_, body) = ctx.get("/marketplace/listings?q=wholesale").await;
    assert_eq!(body["listings"][0]["name"], "Sugar Wholesale 50kg");
}

#[tokio::test]
async fn test_minimum_order_then_single_units() {
    let ctx = admin().await;
    let (status, cart) = ctx
        .post("/marketplace/cart/items", json!({"listingId": 1}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lines"][0]["quantity"], 2);

    let (_, cart) = ctx
        .post("/marketplace/cart/items", json!({"listingId": 1}))
        .await;
    assert_eq!(cart["lines"][0]["quantity"], 3);
    assert_eq!(cart["total"]["amount"], "5400");
}

#[tokio::test]
async fn test_out_of_stock_listing() {
    let ctx = admin().await;
    let (status, _) = ctx
        .post("/marketplace/cart/items", json!({"listingId": 4}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .post("/marketplace/cart/items", json!({"listingId": 42}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_order() {
    let ctx = admin().await;
    ctx.post("/marketplace/cart/items", json!({"listingId": 3}))
        .await;
    ctx.post("/marketplace/cart/items", json!({"listingId": 5}))
        .await;
    let (_, cart) = ctx
        .patch("/marketplace/cart/items/5", json!({"delta": 1}))
        .await;
    assert_eq!(cart["itemCount"], 3);

    let (status, order) = ctx
        .send(Method::POST, "/marketplace/checkout", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["lineCount"], 2);
    assert_eq!(order["total"]["amount"], "5360");

    let (_, cart) = ctx.get("/marketplace/cart").await;
    assert_eq!(cart["lineCount"], 0);

    let (status, _) = ctx
        .send(Method::POST, "/marketplace/checkout", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_marketplace_cart_is_separate_from_pos() {
    let ctx = admin().await;
    ctx.post("/marketplace/cart/items", json!({"listingId": 2}))
        .await;
    let (_, pos) = ctx.get("/pos/cart").await;
    assert_eq!(pos["lineCount"], 0);
}
