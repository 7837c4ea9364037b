//! Session error types.

use inventrak_core::validation::ValidationError;
use thiserror::Error;

/// Errors reading or writing the persisted session record.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Missing or malformed form field.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Wrong password or unknown account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A signup named an account the verifier already knows.
    #[error("an account with this email already exists")]
    AlreadyRegistered,

    /// A newer login, signup, or logout started while this one was waiting.
    #[error("superseded by a newer sign-in request")]
    Superseded,

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Persisting the session record failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}
