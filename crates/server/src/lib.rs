//! Inventrak HTTP server.
//!
//! JSON back office over the `inventrak-core` domain: sign-in with role
//! gating, POS billing with printable receipts, inventory, sales reports,
//! low-stock alerts, the supplier marketplace, and account settings.
//!
//! The binary in `main.rs` wires configuration, logging, and Sentry around
//! [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::{AppError, Result};
pub use state::AppState;
