//! Inventrak Core - Domain types and logic for the retail back office.
//!
//! This crate provides everything the HTTP service and CLI share:
//! - `inventrak-server` - JSON API and receipt pages for one store
//! - `inventrak-cli` - Command-line tools for credentials and reports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no clocks. Callers pass in timestamps and own all shared state.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`cart`] - Cart engine shared by billing and the marketplace
//! - [`catalog`] - Products, search, and inventory editing
//! - [`marketplace`] - Supplier listings and filters
//! - [`alerts`] - Low-stock list, urgency tiers, and notified flags
//! - [`reports`] - Sales ledger and rollups
//! - [`receipt`] - Printable receipt data
//! - [`user`] / [`settings`] - Accounts, profile, and preferences
//! - [`access`] - Which roles may open which sections
//! - [`seed`] - Demo data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod alerts;
pub mod cart;
pub mod catalog;
pub mod marketplace;
pub mod receipt;
pub mod reports;
pub mod seed;
pub mod settings;
pub mod types;
pub mod user;
pub mod validation;

pub use types::*;
