//! Store catalog: products, search predicates, and inventory management.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;
use crate::types::{AmountOverflow, MAX_UNIT_PRICE, Price, ProductId};
use crate::validation::{ValidationError, require};

/// Categories offered by the product editor.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Groceries",
    "Beverages",
    "Snacks",
    "Personal Care",
    "Household",
];

/// Largest stock level, low-stock threshold, or sale quantity accepted.
pub const MAX_UNITS: u32 = 1_000_000;

/// A product on the store's shelves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub stock: u32,
    pub category: String,
    /// Stock level at or below which the product counts as low stock.
    pub threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Bumped on every update, for optimistic concurrency.
    #[serde(default)]
    pub version: u64,
}

impl Product {
    /// Whether stock has fallen to or below the threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock <= self.threshold
    }

    /// `price * stock`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if the product does not fit.
    pub fn stock_value(&self) -> Result<Price, AmountOverflow> {
        self.price.times(self.stock)
    }
}

impl CartItem for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Price {
        self.price
    }

    fn available(&self) -> Option<u32> {
        Some(self.stock)
    }
}

/// Product editor input, used for both create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: String,
    pub threshold: u32,
    #[serde(default)]
    pub barcode: Option<String>,
}

impl ProductDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("category", &self.category)?;
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ValidationError::invalid("price", "must not be negative"));
        }
        if self.price > MAX_UNIT_PRICE {
            return Err(ValidationError::invalid(
                "price",
                format!("must not exceed {MAX_UNIT_PRICE}"),
            ));
        }
        if self.stock > MAX_UNITS {
            return Err(ValidationError::invalid(
                "stock",
                format!("must not exceed {MAX_UNITS}"),
            ));
        }
        if self.threshold > MAX_UNITS {
            return Err(ValidationError::invalid(
                "threshold",
                format!("must not exceed {MAX_UNITS}"),
            ));
        }
        Ok(())
    }

    fn into_product(self, id: ProductId, version: u64) -> Product {
        let barcode = self
            .barcode
            .map(|b| b.trim().to_owned())
            .filter(|b| !b.is_empty());
        Product {
            id,
            name: self.name.trim().to_owned(),
            price: Price::from_amount(self.price),
            stock: self.stock,
            category: self.category.trim().to_owned(),
            threshold: self.threshold,
            barcode,
            version,
        }
    }
}

/// Errors from catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The caller edited a stale copy of the product.
    #[error("product {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        id: ProductId,
        expected: u64,
        actual: u64,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Headline figures for the inventory page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub total_stock_value: Price,
}

/// The store's product list, in insertion order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    next_id: i32,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    /// Build a catalog from existing products. New IDs continue after the
    /// highest one present.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products
            .iter()
            .map(|p| p.id.as_i32())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self { products, next_id }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Point-of-sale lookup: name contains `term` (case-insensitive) or
    /// barcode contains `term`. An empty term matches everything.
    #[must_use]
    pub fn search_for_sale(&self, term: &str) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.barcode.as_deref().is_some_and(|b| b.contains(term.trim()))
            })
            .collect()
    }

    /// Inventory lookup: name or category contains `term` (case-insensitive).
    #[must_use]
    pub fn search_inventory(&self, term: &str) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Add a product with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if a required field is missing
    /// or the price is negative.
    pub fn create(&mut self, draft: ProductDraft) -> Result<&Product, CatalogError> {
        draft.validate()?;
        let id = ProductId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.products.push(draft.into_product(id, 1));
        self.get(id).ok_or(CatalogError::NotFound(id))
    }

    /// Replace a product's fields, keeping its ID and bumping its version.
    ///
    /// When `expected_version` is given it must match the stored version.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if `id` is unknown.
    /// - [`CatalogError::VersionConflict`] on a stale `expected_version`.
    /// - [`CatalogError::Validation`] on bad input.
    pub fn update(
        &mut self,
        id: ProductId,
        draft: ProductDraft,
        expected_version: Option<u64>,
    ) -> Result<&Product, CatalogError> {
        draft.validate()?;
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(expected) = expected_version {
            if expected != slot.version {
                return Err(CatalogError::VersionConflict {
                    id,
                    expected,
                    actual: slot.version,
                });
            }
        }

        *slot = draft.into_product(id, slot.version.saturating_add(1));
        Ok(slot)
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` is unknown.
    pub fn delete(&mut self, id: ProductId) -> Result<Product, CatalogError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        Ok(self.products.remove(index))
    }

    /// Product count, low-stock count, and total stock value.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if the stock value does not fit.
    pub fn summary(&self) -> Result<InventorySummary, AmountOverflow> {
        let values = self
            .products
            .iter()
            .map(Product::stock_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InventorySummary {
            total_products: self.products.len(),
            low_stock_count: self.products.iter().filter(|p| p.is_low_stock()).count(),
            total_stock_value: Price::checked_sum(values)?,
        })
    }
}
