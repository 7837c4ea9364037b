//! Role and status enums.

use serde::{Deserialize, Serialize};

/// Staff role with different permission levels.
///
/// New signups are always [`Role::Admin`] (store owners); cashiers are only
/// produced by login with an explicit role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Store owner with access to every dashboard section.
    Admin,
    /// Billing counter staff; point of sale and settings only.
    Cashier,
}

impl Role {
    /// Human-readable label shown next to the user's name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Owner/Admin",
            Self::Cashier => "Cashier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Cashier => write!(f, "cashier"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "cashier" => Ok(Self::Cashier),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Restocking priority of a low-stock product.
///
/// Ordered from most to least urgent, so sorting ascending puts
/// [`UrgencyTier::Critical`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    Critical,
    Urgent,
    Warning,
}

impl std::fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Urgent => write!(f, "urgent"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Admin, Role::Cashier] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!("manager".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Cashier).unwrap(), "\"cashier\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_urgency_ordering() {
        let mut tiers = vec![UrgencyTier::Warning, UrgencyTier::Critical, UrgencyTier::Urgent];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![UrgencyTier::Critical, UrgencyTier::Urgent, UrgencyTier::Warning]
        );
    }
}
