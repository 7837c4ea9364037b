//! Sign-in, role gating, and sign-out over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use inventrak_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let (status, body) = ctx.send_raw(axum::http::Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_landing_follows_session() {
    let ctx = TestContext::new();
    let (_, body) = ctx.get("/").await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["sections"], json!([]));

    ctx.login_as("cashier").await;
    let (_, body) = ctx.get("/").await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["sections"], json!(["pos", "settings"]));
}

#[tokio::test]
async fn test_sections_require_sign_in() {
    let ctx = TestContext::new();
    for uri in ["/auth/session", "/pos/cart", "/products", "/lowstock", "/settings/profile"] {
        let (status, body) = ctx.get(uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "sign in required");
    }
}

#[tokio::test]
async fn test_admin_login_opens_every_section() {
    let ctx = TestContext::new();
    let body = ctx.login_as("admin").await;
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["name"], "John Doe");
    assert_eq!(body["user"]["companyName"], "Demo Store");
    assert_eq!(body["sections"].as_array().unwrap().len(), 6);

    let (status, session) = ctx.get("/auth/session").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["user"]["email"], "admin@example.com");
}

#[tokio::test]
async fn test_cashier_limited_to_pos_and_settings() {
    let ctx = TestContext::new();
    let body = ctx.login_as("cashier").await;
    assert_eq!(body["sections"], json!(["pos", "settings"]));

    assert_eq!(ctx.get("/pos/cart").await.0, StatusCode::OK);
    assert_eq!(ctx.get("/settings/profile").await.0, StatusCode::OK);
    for uri in ["/products", "/reports/sales", "/lowstock", "/marketplace/listings"] {
        let (status, _) = ctx.get(uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn test_login_validation() {
    let ctx = TestContext::new();
    let (status, _) = ctx
        .post("/auth/login", json!({"email": "a@example.com", "password": "", "role": "admin"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post("/auth/login", json!({"email": "a@example.com", "password": "x", "role": "manager"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(ctx.get("/auth/session").await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_creates_admin() {
    let ctx = TestContext::new();
    let (status, body) = ctx
        .post(
            "/auth/signup",
            json!({
                "name": "Asha Rao",
                "email": "asha@corner.shop",
                "phone": "9876543210",
                "companyName": "Corner Shop",
                "businessCategory": "Kirana",
                "password": "secret1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["companyName"], "Corner Shop");
}

#[tokio::test]
async fn test_signup_missing_field() {
    let ctx = TestContext::new();
    let (status, body) = ctx
        .post(
            "/auth/signup",
            json!({"name": "Asha", "email": "asha@corner.shop", "password": "secret1"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_logout() {
    let ctx = TestContext::new();
    ctx.login_as("admin").await;

    let (status, _) = ctx.send(axum::http::Method::POST, "/auth/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(ctx.get("/auth/session").await.0, StatusCode::UNAUTHORIZED);
    assert!(!ctx.state.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_empties_carts_for_next_user() {
    let ctx = TestContext::new();
    ctx.login_as("admin").await;
    ctx.post("/pos/cart/items", json!({"productId": 1, "quantity": 2}))
        .await;
    ctx.post("/marketplace/cart/items", json!({"listingId": 1}))
        .await;

    ctx.send(axum::http::Method::POST, "/auth/logout", None).await;
    ctx.login_as("cashier").await;

    let (status, cart) = ctx.get("/pos/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lineCount"], 0);
    assert_eq!(cart["total"]["amount"], "0");
    assert!(ctx.state.marketplace_cart().is_empty());
}
