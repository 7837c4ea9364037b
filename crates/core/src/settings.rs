//! Account settings: notification preferences and password changes.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require};

/// Minimum length of a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Which alerts the store owner wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub low_stock_alerts: bool,
    pub daily_reports: bool,
    pub sales_notifications: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            low_stock_alerts: true,
            daily_reports: false,
            sales_notifications: true,
            email_notifications: true,
            sms_notifications: false,
        }
    }
}

/// Check a password change request before it reaches the credential store.
///
/// All three fields are required, the new password must match its
/// confirmation, and it must be at least [`MIN_PASSWORD_LENGTH`] characters.
///
/// # Errors
///
/// Returns a [`ValidationError`] describing the first failed rule.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    require("currentPassword", current)?;
    require("newPassword", new)?;
    require("confirmPassword", confirm)?;

    if new != confirm {
        return Err(ValidationError::invalid(
            "confirmPassword",
            "new password and confirm password do not match",
        ));
    }

    if new.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::invalid(
            "newPassword",
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = NotificationSettings::default();
        assert!(settings.low_stock_alerts);
        assert!(!settings.daily_reports);
        assert!(settings.sales_notifications);
        assert!(settings.email_notifications);
        assert!(!settings.sms_notifications);
    }

    #[test]
    fn test_password_change_ok() {
        assert_eq!(validate_password_change("old", "newpass", "newpass"), Ok(()));
    }

    #[test]
    fn test_password_change_missing() {
        assert_eq!(
            validate_password_change("", "newpass", "newpass"),
            Err(ValidationError::Required {
                field: "currentPassword"
            })
        );
    }

    #[test]
    fn test_password_change_mismatch() {
        let err = validate_password_change("old", "newpass", "newpasz").unwrap_err();
        assert_eq!(err.field(), "confirmPassword");
    }

    #[test]
    fn test_password_change_too_short() {
        let err = validate_password_change("old", "abc12", "abc12").unwrap_err();
        assert_eq!(err.field(), "newPassword");
        assert!(validate_password_change("old", "abc123", "abc123").is_ok());
    }
}
