//! Form validation errors.
//!
//! Every form submission (login, signup, product editor, settings) reports
//! problems as a [`ValidationError`]. These are surfaced inline to the user
//! and never abort anything beyond the submission itself.

use thiserror::Error;

/// A missing or malformed field on a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty or blank.
    #[error("{field} is required")]
    Required {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field was present but not acceptable.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Invalid`].
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Required { field } | Self::Invalid { field, .. } => field,
        }
    }
}

/// Require a non-blank value, returning it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] if `value` is empty or whitespace.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed)
    }
}
