//! Cart engine shared by point-of-sale billing and the supplier marketplace.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, one per item ID, kept in
//! the order items were first added. Quantity reconciliation rules:
//!
//! - adding an item already in the cart merges into its line;
//! - a line's quantity never exceeds the item's available stock; an add or
//!   adjustment that would overshoot is rejected and the cart is unchanged;
//! - a line whose quantity reaches zero is removed, never retained;
//! - [`Cart::refresh`] re-reads every line from the live catalog, and
//!   checkout re-checks every line against the refreshed stock.
//!
//! Totals are exact decimal sums of `unit price * quantity`. A mutation
//! whose total would not fit a `Decimal` is rejected.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::types::{AmountOverflow, Price};
use crate::validation::ValidationError;

/// Something that can be put in a cart.
///
/// The cart stores a clone of the item as a snapshot. The most recent add,
/// or a [`Cart::refresh`], replaces the snapshot so prices and stock ceilings
/// follow the catalog.
pub trait CartItem: Clone {
    /// Identifier used to merge lines.
    type Id: Copy + Eq + fmt::Display;

    fn id(&self) -> Self::Id;

    fn name(&self) -> &str;

    fn unit_price(&self) -> Price;

    /// Units that may be placed in a single line, or `None` when the
    /// supply is unbounded.
    fn available(&self) -> Option<u32>;
}

/// Errors from cart operations. The cart is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested quantity is more than the item's stock.
    #[error("insufficient stock for {name}: only {available} available")]
    InsufficientStock {
        name: String,
        requested: u64,
        available: u32,
    },

    /// Checkout attempted with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// No line exists for the given item ID.
    #[error("item {0} is not in the cart")]
    LineNotFound(String),

    /// Bad quantity on an add.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cart total would not fit a `Decimal`.
    #[error("cart total is out of range")]
    Overflow(#[from] AmountOverflow),
}

/// One item plus a quantity awaiting checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine<T> {
    pub item: T,
    pub quantity: u32,
}

impl<T: CartItem> CartLine<T> {
    /// `unit price * quantity`, exact.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if the product does not fit.
    pub fn line_total(&self) -> Result<Price, AmountOverflow> {
        self.item.unit_price().times(self.quantity)
    }
}

/// Result of a successful checkout: the lines that were in the cart and
/// their total. The cart is empty afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout<T> {
    pub lines: Vec<CartLine<T>>,
    pub total: Price,
}

/// An ordered collection of cart lines for one checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart<T> {
    lines: Vec<CartLine<T>>,
}

impl<T> Default for Cart<T> {
    fn default() -> Self {
        Self { lines: Vec::new() }
    }
}

impl<T: CartItem> Cart<T> {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order their items were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<T>] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: T::Id) -> Option<&CartLine<T>> {
        self.lines.iter().find(|line| line.item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: T::Id) -> bool {
        self.line(id).is_some()
    }

    /// Add `quantity` units of `item`.
    ///
    /// Merges into the existing line for `item.id()` or appends a new line.
    /// Returns the resulting line quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`] if `quantity` is zero.
    /// - [`CartError::InsufficientStock`] if the line would exceed the
    ///   item's available stock.
    /// - [`CartError::Overflow`] if the cart total would be out of range.
    pub fn add_item(&mut self, item: &T, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(ValidationError::invalid("quantity", "must be at least 1").into());
        }

        let id = item.id();
        let current = self.line(id).map_or(0, |line| line.quantity);
        let wanted = u64::from(current) + u64::from(quantity);
        let new_quantity = check_stock(item, wanted)?;
        let line = CartLine {
            item: item.clone(),
            quantity: new_quantity,
        };

        match self.lines.iter().position(|line| line.item.id() == id) {
            Some(index) => {
                let previous = self.replace_line(index, line);
                if let Err(err) = self.total() {
                    if let Some(previous) = previous {
                        self.replace_line(index, previous);
                    }
                    return Err(err.into());
                }
            }
            None => {
                self.lines.push(line);
                if let Err(err) = self.total() {
                    self.lines.pop();
                    return Err(err.into());
                }
            }
        }

        Ok(new_quantity)
    }

    /// Add `delta` to the quantity of the line for `id`.
    ///
    /// A result of zero or less removes the line and returns `None`;
    /// otherwise returns the new quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`] if no line exists for `id`.
    /// - [`CartError::InsufficientStock`] if the new quantity would exceed
    ///   the line item's available stock.
    /// - [`CartError::Overflow`] if the cart total would be out of range.
    pub fn adjust_quantity(&mut self, id: T::Id, delta: i64) -> Result<Option<u32>, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.item.id() == id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;
        let current = self.lines.get(index).map_or(0, |line| line.quantity);

        let wanted = i64::from(current).saturating_add(delta);
        if wanted <= 0 {
            self.lines.remove(index);
            return Ok(None);
        }

        let Some(line) = self.lines.get_mut(index) else {
            return Err(CartError::LineNotFound(id.to_string()));
        };
        let new_quantity = check_stock(&line.item, wanted.unsigned_abs())?;
        line.quantity = new_quantity;
        if let Err(err) = self.total() {
            if let Some(line) = self.lines.get_mut(index) {
                line.quantity = current;
            }
            return Err(err.into());
        }
        Ok(Some(new_quantity))
    }

    /// Remove the line for `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: T::Id) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.item.id() != id);
        self.lines.len() != before
    }

    /// Re-read every line's item through `lookup`.
    ///
    /// Lines whose item is gone are dropped; the rest take the fresh
    /// snapshot and keep their quantity. Returns the number of lines dropped.
    pub fn refresh(&mut self, mut lookup: impl FnMut(T::Id) -> Option<T>) -> usize {
        let before = self.lines.len();
        self.lines.retain_mut(|line| match lookup(line.item.id()) {
            Some(item) => {
                line.item = item;
                true
            }
            None => false,
        });
        before - self.lines.len()
    }

    /// Sum of `unit price * quantity` over all lines.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if the sum does not fit.
    pub fn total(&self) -> Result<Price, AmountOverflow> {
        let mut total = Price::default();
        for line in &self.lines {
            total = total.checked_add(line.line_total()?)?;
        }
        Ok(total)
    }

    /// Take every line and the total, leaving the cart empty.
    ///
    /// Every line is checked against its snapshot's stock first, so callers
    /// should [`refresh`](Self::refresh) beforehand.
    ///
    /// # Errors
    ///
    /// The cart is unchanged on error.
    ///
    /// - [`CartError::EmptyCart`] if there are no lines.
    /// - [`CartError::InsufficientStock`] if a line exceeds its item's stock.
    /// - [`CartError::Overflow`] if the total is out of range.
    pub fn checkout(&mut self) -> Result<Checkout<T>, CartError> {
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }
        for line in &self.lines {
            check_stock(&line.item, u64::from(line.quantity))?;
        }
        let total = self.total()?;
        let lines = std::mem::take(&mut self.lines);
        Ok(Checkout { lines, total })
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn replace_line(&mut self, index: usize, line: CartLine<T>) -> Option<CartLine<T>> {
        self.lines
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, line))
    }
}

fn check_stock<T: CartItem>(item: &T, wanted: u64) -> Result<u32, CartError> {
    let insufficient = |available: u32| CartError::InsufficientStock {
        name: item.name().to_owned(),
        requested: wanted,
        available,
    };

    match item.available() {
        Some(available) if wanted > u64::from(available) => Err(insufficient(available)),
        _ => u32::try_from(wanted).map_err(|_| insufficient(u32::MAX)),
    }
}
