//! Account settings over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use inventrak_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_update_profile() {
    let ctx = TestContext::new();
    ctx.login_as("admin").await;

    let (status, user) = ctx
        .put(
            "/settings/profile",
            json!({
                "name": "Ravi Kumar",
                "email": "ravi@kumar.store",
                "companyName": "Kumar General Store",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["companyName"], "Kumar General Store");
    // Category kept when not supplied.
    assert_eq!(user["businessCategory"], "Kirana");

    let (_, session) = ctx.get("/auth/session").await;
    assert_eq!(session["user"]["name"], "Ravi Kumar");

    let (status, _) = ctx
        .put("/settings/profile", json!({"name": "", "email": "x@y.z", "companyName": "A"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_notification_preferences() {
    let ctx = TestContext::new();
    ctx.login_as("admin").await;

    let (_, prefs) = ctx.get("/settings/notifications").await;
    assert_eq!(prefs["lowStockAlerts"], true);

    let mut changed = prefs.clone();
    changed["smsNotifications"] = json!(true);
    changed["lowStockAlerts"] = json!(false);
    let (status, saved) = ctx.put("/settings/notifications", changed.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved, changed);

    let (_, prefs) = ctx.get("/settings/notifications").await;
    assert_eq!(prefs["smsNotifications"], true);
}

#[tokio::test]
async fn test_change_password() {
    let ctx = TestContext::new();
    ctx.login_as("cashier").await;

    let (status, _) = ctx
        .post(
            "/settings/password",
            json!({"currentPassword": "secret", "newPassword": "abcdef", "confirmPassword": "abcdeg"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post(
            "/settings/password",
            json!({"currentPassword": "secret", "newPassword": "abc", "confirmPassword": "abc"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post(
            "/settings/password",
            json!({"currentPassword": "secret", "newPassword": "abcdef", "confirmPassword": "abcdef"}),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
