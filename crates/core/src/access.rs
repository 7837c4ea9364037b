//! Role-based access to dashboard sections.
//!
//! The permission table is static: a section is either open to a role or it
//! is not. Route guards call [`can_access`] before touching section state.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// A dashboard section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Pos,
    Inventory,
    Reports,
    LowStock,
    Marketplace,
    Settings,
}

impl Section {
    /// Every section, in navigation order.
    pub const ALL: [Self; 6] = [
        Self::Pos,
        Self::Inventory,
        Self::Reports,
        Self::LowStock,
        Self::Marketplace,
        Self::Settings,
    ];

    /// Navigation label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pos => "POS (Billing)",
            Self::Inventory => "Inventory",
            Self::Reports => "Reports",
            Self::LowStock => "Low Stock",
            Self::Marketplace => "Marketplace",
            Self::Settings => "Settings",
        }
    }

    /// Roles allowed into this section.
    #[must_use]
    pub const fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Pos | Self::Settings => &[Role::Admin, Role::Cashier],
            Self::Inventory | Self::Reports | Self::LowStock | Self::Marketplace => &[Role::Admin],
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `role` may open `section`.
#[must_use]
pub fn can_access(role: Role, section: Section) -> bool {
    section.allowed_roles().contains(&role)
}

/// Sections visible to `role`, in navigation order.
#[must_use]
pub fn sections_for(role: Role) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| can_access(role, *section))
        .collect()
}
