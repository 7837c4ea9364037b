//! Type-safe price representation using decimal arithmetic.
//!
//! All money in Inventrak is a [`Price`]: a `rust_decimal::Decimal` amount in
//! the currency's standard unit, tagged with an ISO 4217 code. Arithmetic is
//! exact; nothing is rounded until a value is formatted for display.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest unit price accepted from a form or submitted sale (10,000,000).
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Money arithmetic left the range of [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount is out of range")]
pub struct AmountOverflow;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn from_amount(amount: impl Into<Decimal>) -> Self {
        Self::new(amount.into(), CurrencyCode::default())
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Multiply the unit price by a quantity (exact).
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if the product does not fit a [`Decimal`].
    pub fn times(self, quantity: u32) -> Result<Self, AmountOverflow> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(AmountOverflow)
    }

    /// Add two prices. The left operand's currency is kept; catalogs are
    /// single-currency.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if the sum does not fit a [`Decimal`].
    pub fn checked_add(self, rhs: Self) -> Result<Self, AmountOverflow> {
        self.amount
            .checked_add(rhs.amount)
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(AmountOverflow)
    }

    /// Sum of `prices`, zero in the default currency when empty.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if any partial sum does not fit.
    pub fn checked_sum(prices: impl IntoIterator<Item = Self>) -> Result<Self, AmountOverflow> {
        prices.into_iter().try_fold(Self::default(), Self::checked_add)
    }

    /// Returns `true` if the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Format for display (e.g., "₹120.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero(CurrencyCode::default())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}
