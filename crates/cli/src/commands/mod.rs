//! CLI subcommands.

pub mod credentials;
pub mod report;

use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] inventrak_core::EmailError),

    #[error("Password is empty")]
    EmptyPassword,

    #[error("Could not hash password: {0}")]
    Hash(#[from] inventrak_server::services::session::SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] inventrak_server::config::ConfigError),

    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid transaction file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sales total out of range: {0}")]
    Amount(#[from] inventrak_core::AmountOverflow),
}
