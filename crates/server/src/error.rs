//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Error bodies are JSON: `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inventrak_core::AmountOverflow;
use inventrak_core::alerts::AlertError;
use inventrak_core::cart::CartError;
use inventrak_core::catalog::CatalogError;
use inventrak_core::validation::ValidationError;
use serde_json::json;
use thiserror::Error;

use crate::services::session::SessionError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Inventory operation rejected.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Money arithmetic out of range.
    #[error("Amount error: {0}")]
    Amount(#[from] AmountOverflow),

    /// Low-stock operation rejected.
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    /// Sign-in or session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User's role may not open this section.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Amount(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Cart(err) => match err {
                CartError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CartError::EmptyCart | CartError::Validation(_) | CartError::Overflow(_) => {
                    StatusCode::BAD_REQUEST
                }
                CartError::LineNotFound(_) => StatusCode::NOT_FOUND,
            },
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::VersionConflict { .. } => StatusCode::CONFLICT,
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            },
            Self::Alert(AlertError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Session(err) => match err {
                SessionError::Validation(_) => StatusCode::BAD_REQUEST,
                SessionError::InvalidCredentials | SessionError::NotSignedIn => {
                    StatusCode::UNAUTHORIZED
                }
                SessionError::AlreadyRegistered | SessionError::Superseded => StatusCode::CONFLICT,
                SessionError::Storage(_) | SessionError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            match &self {
                Self::Validation(err) => err.to_string(),
                Self::Cart(err) => err.to_string(),
                Self::Catalog(err) => err.to_string(),
                Self::Amount(err) => err.to_string(),
                Self::Alert(err) => err.to_string(),
                Self::Session(err) => err.to_string(),
                Self::NotFound(msg)
                | Self::Unauthorized(msg)
                | Self::Forbidden(msg)
                | Self::BadRequest(msg)
                | Self::Internal(msg) => msg.clone(),
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a store action (checkout, stock edit, notify).
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
