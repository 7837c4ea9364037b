//! JSON shapes shared by the cart-bearing sections.

use inventrak_core::{AmountOverflow, Price};
use inventrak_core::cart::{Cart, CartItem, CartLine, Checkout};
use serde::Serialize;

/// A cart line with its computed total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView<T> {
    pub item: T,
    pub quantity: u32,
    pub line_total: Price,
}

impl<T: CartItem> TryFrom<&CartLine<T>> for LineView<T> {
    type Error = AmountOverflow;

    fn try_from(line: &CartLine<T>) -> Result<Self, Self::Error> {
        Ok(Self {
            item: line.item.clone(),
            quantity: line.quantity,
            line_total: line.line_total()?,
        })
    }
}

fn line_views<T: CartItem>(lines: &[CartLine<T>]) -> Result<Vec<LineView<T>>, AmountOverflow> {
    lines.iter().map(LineView::try_from).collect()
}

/// Cart contents plus totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView<T> {
    pub lines: Vec<LineView<T>>,
    pub total: Price,
    pub item_count: u64,
    pub line_count: usize,
}

impl<T: CartItem> TryFrom<&Cart<T>> for CartView<T> {
    type Error = AmountOverflow;

    fn try_from(cart: &Cart<T>) -> Result<Self, Self::Error> {
        Ok(Self {
            lines: line_views(cart.lines())?,
            total: cart.total()?,
            item_count: cart.item_count(),
            line_count: cart.len(),
        })
    }
}

impl<T: CartItem> TryFrom<&Checkout<T>> for CartView<T> {
    type Error = AmountOverflow;

    fn try_from(checkout: &Checkout<T>) -> Result<Self, Self::Error> {
        Ok(Self {
            lines: line_views(&checkout.lines)?,
            total: checkout.total,
            item_count: checkout.lines.iter().map(|l| u64::from(l.quantity)).sum(),
            line_count: checkout.lines.len(),
        })
    }
}

/// Outcome of removing a line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveView<T> {
    /// Whether a line existed for the item.
    pub removed: bool,
    pub cart: CartView<T>,
}
