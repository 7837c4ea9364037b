//! Business services for the server.
//!
//! # Services
//!
//! - `session` - Sign-in state, credential checks, and the persisted record
//! - `receipt` - HTML receipt rendering

pub mod receipt;
pub mod session;
