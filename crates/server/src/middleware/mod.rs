//! HTTP middleware stack for the server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (browser front ends on other origins)
//!
//! Authentication is not a layer: handlers take a [`RequireAuth`] or a
//! per-section extractor such as [`RequireInventory`].

pub mod auth;
pub mod request_id;

pub use auth::{
    RequireAuth, RequireInventory, RequireLowStock, RequireMarketplace, RequirePos,
    RequireReports, RequireSettings,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
