//! Low-stock alerting.
//!
//! The low-stock list is derived from the catalog on every call; the only
//! state owned here is which products have been flagged to the supplier.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, Product};
use crate::types::{Price, ProductId, UrgencyTier};

/// Errors from alert operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// The product does not exist or is not currently low on stock.
    #[error("product {0} is not on the low-stock list")]
    NotFound(ProductId),
}

/// Urgency cut-offs given in the wrong order. Only raised while building a
/// policy from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("critical cut-off ({critical}%) must not exceed urgent cut-off ({urgent}%)")]
pub struct InvertedCutoffs {
    pub critical: u32,
    pub urgent: u32,
}

// =============================================================================
// Urgency
// =============================================================================

/// Percentage cut-offs splitting low-stock items into urgency tiers.
///
/// With `stock / threshold * 100` as the stock percentage, an item is
/// critical at or below `critical_pct`, urgent at or below `urgent_pct`,
/// and a warning otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyPolicy {
    critical_pct: u32,
    urgent_pct: u32,
}

impl Default for UrgencyPolicy {
    fn default() -> Self {
        Self {
            critical_pct: Self::DEFAULT_CRITICAL_PCT,
            urgent_pct: Self::DEFAULT_URGENT_PCT,
        }
    }
}

impl UrgencyPolicy {
    pub const DEFAULT_CRITICAL_PCT: u32 = 25;
    pub const DEFAULT_URGENT_PCT: u32 = 50;

    /// Build a policy from explicit cut-offs.
    ///
    /// # Errors
    ///
    /// Returns [`InvertedCutoffs`] if `critical_pct > urgent_pct`.
    pub const fn new(critical_pct: u32, urgent_pct: u32) -> Result<Self, InvertedCutoffs> {
        if critical_pct > urgent_pct {
            return Err(InvertedCutoffs {
                critical: critical_pct,
                urgent: urgent_pct,
            });
        }
        Ok(Self {
            critical_pct,
            urgent_pct,
        })
    }

    #[must_use]
    pub const fn critical_pct(&self) -> u32 {
        self.critical_pct
    }

    #[must_use]
    pub const fn urgent_pct(&self) -> u32 {
        self.urgent_pct
    }

    /// Tier for `stock` against `threshold`.
    ///
    /// Compares `stock * 100` with `pct * threshold` so boundaries are exact.
    /// A zero threshold with zero stock is critical.
    #[must_use]
    pub fn classify(&self, stock: u32, threshold: u32) -> UrgencyTier {
        let scaled = u64::from(stock) * 100;
        let limit = |pct: u32| u64::from(pct) * u64::from(threshold);

        if scaled <= limit(self.critical_pct) {
            UrgencyTier::Critical
        } else if scaled <= limit(self.urgent_pct) {
            UrgencyTier::Urgent
        } else {
            UrgencyTier::Warning
        }
    }
}

/// `stock / threshold * 100`, rounded half up to a whole percent.
///
/// Returns 0 for a zero threshold.
#[must_use]
pub fn stock_percentage(stock: u32, threshold: u32) -> u32 {
    if threshold == 0 {
        return 0;
    }
    let threshold = u64::from(threshold);
    let rounded = (u64::from(stock) * 200 + threshold) / (2 * threshold);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

// =============================================================================
// Low-stock list
// =============================================================================

/// A product at or below its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub stock: u32,
    pub threshold: u32,
    /// Rounded stock percentage of threshold.
    pub percentage: u32,
    pub urgency: UrgencyTier,
    pub notified: bool,
}

/// Suggested restocking action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Critical plus urgent items.
    pub order_urgently: usize,
    /// Names of critical items, in catalog order.
    pub priority_items: Vec<String>,
}

/// Everything the low-stock page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockReport {
    pub items: Vec<LowStockItem>,
    pub critical_count: usize,
    pub urgent_count: usize,
    pub warning_count: usize,
    pub notified_count: usize,
    /// Absent when nothing is low on stock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
}

/// Notified flags for low-stock products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LowStockBoard {
    notified: BTreeSet<ProductId>,
}

impl LowStockBoard {
    #[must_use]
    pub fn new(notified: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            notified: notified.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_notified(&self, id: ProductId) -> bool {
        self.notified.contains(&id)
    }

    /// Every low-stock product in catalog order.
    #[must_use]
    pub fn items(&self, catalog: &Catalog, policy: &UrgencyPolicy) -> Vec<LowStockItem> {
        catalog
            .products()
            .iter()
            .filter(|p| p.is_low_stock())
            .map(|p| self.item(p, policy))
            .collect()
    }

    fn item(&self, product: &Product, policy: &UrgencyPolicy) -> LowStockItem {
        LowStockItem {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            threshold: product.threshold,
            percentage: stock_percentage(product.stock, product.threshold),
            urgency: policy.classify(product.stock, product.threshold),
            notified: self.is_notified(product.id),
        }
    }

    /// Low-stock items with per-tier counts and a recommendation.
    #[must_use]
    pub fn report(&self, catalog: &Catalog, policy: &UrgencyPolicy) -> LowStockReport {
        let items = self.items(catalog, policy);
        let count = |tier: UrgencyTier| items.iter().filter(|i| i.urgency == tier).count();
        let critical_count = count(UrgencyTier::Critical);
        let urgent_count = count(UrgencyTier::Urgent);
        let warning_count = count(UrgencyTier::Warning);
        let notified_count = items.iter().filter(|i| i.notified).count();

        let recommendation = (!items.is_empty()).then(|| Recommendation {
            order_urgently: critical_count + urgent_count,
            priority_items: items
                .iter()
                .filter(|i| i.urgency == UrgencyTier::Critical)
                .map(|i| i.name.clone())
                .collect(),
        });

        LowStockReport {
            items,
            critical_count,
            urgent_count,
            warning_count,
            notified_count,
            recommendation,
        }
    }

    /// Flag one low-stock product as notified. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::NotFound`] if the product is unknown or not low
    /// on stock.
    pub fn mark_notified(&mut self, catalog: &Catalog, id: ProductId) -> Result<(), AlertError> {
        match catalog.get(id) {
            Some(product) if product.is_low_stock() => {
                self.notified.insert(id);
                Ok(())
            }
            _ => Err(AlertError::NotFound(id)),
        }
    }

    /// Flag every current low-stock product. Returns how many were newly
    /// flagged.
    pub fn mark_all(&mut self, catalog: &Catalog) -> usize {
        catalog
            .products()
            .iter()
            .filter(|p| p.is_low_stock())
            .filter(|p| self.notified.insert(p.id))
            .count()
    }
}
