//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                - Landing (navigation for the current user)
//! GET    /health                          - Health check
//!
//! # Auth
//! POST   /auth/login                      - Sign in (email, password, role)
//! POST   /auth/signup                     - Create a store account
//! POST   /auth/logout                     - Sign out
//! GET    /auth/session                    - Current user and sections
//!
//! # Inventory (admin)
//! GET    /products?q=                     - Search with summary
//! POST   /products                        - Create
//! GET    /products/{id}                   - Detail
//! PUT    /products/{id}                   - Replace (optional expectedVersion)
//! DELETE /products/{id}                   - Delete
//!
//! # POS (every role)
//! GET    /pos/products?q=                 - Search by name or barcode
//! GET    /pos/cart                        - Cart contents
//! POST   /pos/cart/items                  - Add {productId, quantity?}
//! PATCH  /pos/cart/items/{id}             - Adjust {delta}
//! DELETE /pos/cart/items/{id}             - Remove line
//! POST   /pos/checkout                    - Complete sale
//! POST   /transactions                    - Record a sale directly
//! GET    /transactions/{id}               - Transaction detail
//! GET    /transactions/{id}/receipt       - Printable receipt (HTML)
//!
//! # Reports (admin)
//! GET    /reports/sales?period=&date=&top=
//!
//! # Low stock (admin)
//! GET    /lowstock                        - Urgency report
//! PATCH  /lowstock/{id}/notify            - Mark supplier notified
//! POST   /lowstock/notify-all             - Mark every item notified
//!
//! # Marketplace (admin)
//! GET    /marketplace/listings?q=&category=
//! GET    /marketplace/cart
//! POST   /marketplace/cart/items          - Add {listingId}
//! PATCH  /marketplace/cart/items/{id}     - Adjust {delta}
//! DELETE /marketplace/cart/items/{id}
//! POST   /marketplace/checkout            - Place supplier order
//!
//! # Settings (every role)
//! GET|PUT /settings/profile
//! GET|PUT /settings/notifications
//! POST    /settings/password
//! ```

pub mod auth;
pub mod home;
pub mod inventory;
pub mod lowstock;
pub mod marketplace;
pub mod pos;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod views;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create the inventory routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(inventory::index).post(inventory::create))
        .route(
            "/{id}",
            get(inventory::show)
                .put(inventory::update)
                .delete(inventory::delete),
        )
}

/// Create the POS routes router.
pub fn pos_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(pos::search))
        .route("/cart", get(pos::cart))
        .route("/cart/items", post(pos::add))
        .route("/cart/items/{id}", patch(pos::adjust).delete(pos::remove))
        .route("/checkout", post(pos::checkout))
}

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(transactions::submit))
        .route("/{id}", get(transactions::show))
        .route("/{id}/receipt", get(transactions::receipt))
}

pub fn lowstock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(lowstock::report))
        .route("/{id}/notify", patch(lowstock::notify))
        .route("/notify-all", post(lowstock::notify_all))
}

pub fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route("/listings", get(marketplace::listings))
        .route("/cart", get(marketplace::cart))
        .route("/cart/items", post(marketplace::add))
        .route(
            "/cart/items/{id}",
            patch(marketplace::adjust).delete(marketplace::remove),
        )
        .route("/checkout", post(marketplace::checkout))
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(settings::profile).put(settings::update_profile),
        )
        .route(
            "/notifications",
            get(settings::notifications).put(settings::update_notifications),
        )
        .route("/password", post(settings::change_password))
}

/// Create all section routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::landing))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/pos", pos_routes())
        .nest("/transactions", transaction_routes())
        .route("/reports/sales", get(reports::sales))
        .nest("/lowstock", lowstock_routes())
        .nest("/marketplace", marketplace_routes())
        .nest("/settings", settings_routes())
}

/// Build the full application with health check and middleware, minus the
/// Sentry layers the binary adds on top.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
