//! Authentication and section-access extractors.
//!
//! [`RequireAuth`] rejects requests without a signed-in user (401). The
//! per-section extractors additionally check the role table and reject with
//! 403 when the user's role may not open the section.

use axum::{extract::FromRequestParts, http::request::Parts};
use inventrak_core::access::{Section, can_access};
use inventrak_core::user::User;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> String {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .session()
            .current_user()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("sign in required".to_string()))
    }
}

/// Check that `user` may open `section`.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the role is not allowed.
pub fn authorize(user: &User, section: Section) -> Result<(), AppError> {
    if can_access(user.role, section) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, role = %user.role, %section, "Section access denied");
        Err(AppError::Forbidden(format!(
            "{} accounts cannot open {section}",
            user.role.label()
        )))
    }
}

macro_rules! section_extractor {
    ($(#[$meta:meta])* $name:ident => $section:expr) => {
        $(#[$meta])*
        pub struct $name(pub User);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
                authorize(&user, $section)?;
                Ok(Self(user))
            }
        }
    };
}

section_extractor!(
    /// Signed-in user allowed into point-of-sale billing.
    RequirePos => Section::Pos
);
section_extractor!(
    /// Signed-in user allowed into inventory management.
    RequireInventory => Section::Inventory
);
section_extractor!(
    /// Signed-in user allowed into sales reports.
    RequireReports => Section::Reports
);
section_extractor!(
    /// Signed-in user allowed into low-stock alerts.
    RequireLowStock => Section::LowStock
);
section_extractor!(
    /// Signed-in user allowed into the supplier marketplace.
    RequireMarketplace => Section::Marketplace
);
section_extractor!(
    /// Signed-in user allowed into account settings.
    RequireSettings => Section::Settings
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use inventrak_core::{Email, Role, UserId};

    use super::*;

    fn user(role: Role) -> User {
        User::synthesized(UserId::new(1), Email::parse("till@example.com").unwrap(), role)
    }

    #[test]
    fn test_authorize_cashier() {
        assert!(authorize(&user(Role::Cashier), Section::Pos).is_ok());
        assert!(matches!(
            authorize(&user(Role::Cashier), Section::Inventory),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_authorize_admin() {
        for section in Section::ALL {
            assert!(authorize(&user(Role::Admin), section).is_ok());
        }
    }
}
