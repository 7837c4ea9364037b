//! End-to-end tests for the Inventrak server.
//!
//! Each test drives the full router in process through
//! `tower::ServiceExt::oneshot`; no port is bound and the session lives in
//! memory.
//!
//! ```rust,ignore
//! let ctx = TestContext::new();
//! ctx.login_as("admin").await;
//! let (status, body) = ctx.get("/lowstock").await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use inventrak_server::services::session::MemorySessionStorage;
use inventrak_server::{AppState, ServerConfig, routes};
use serde_json::{Value, json};
use tower::ServiceExt;

/// A fresh store: seed data, no signed-in user, no simulated delay.
#[derive(Clone)]
pub struct TestContext {
    pub state: AppState,
    app: Router,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// # Panics
    ///
    /// Panics if the state cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// # Panics
    ///
    /// Panics if the state cannot be built.
    #[must_use]
    pub fn with_config(config: ServerConfig) -> Self {
        let config = ServerConfig {
            auth_delay: Duration::ZERO,
            ..config
        };
        let state = AppState::with_storage(config, Arc::new(MemorySessionStorage::default()))
            .unwrap_or_else(|e| panic!("state: {e}"));
        let app = routes::app(state.clone());
        Self { state, app }
    }

    /// Send a request and decode the body as JSON. An empty body becomes
    /// `Null` and non-JSON text becomes a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, text) = self.send_raw(method, uri, body).await;
        let json = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        (status, json)
    }

    /// Send a request and return the body as text.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap_or_else(|e| panic!("request: {e}"));

        let response = match self.app.clone().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("body: {e}"));
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Sign in as `role` with a throwaway email and password.
    ///
    /// # Panics
    ///
    /// Panics if sign-in is rejected.
    pub async fn login_as(&self, role: &str) -> Value {
        let (status, body) = self
            .post(
                "/auth/login",
                json!({
                    "email": format!("{role}@example.com"),
                    "password": "secret",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body
    }
}
