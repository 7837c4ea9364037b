//! Sales ledger and rollups.
//!
//! Rollups are pure functions over a slice of [`Transaction`]s; nothing is
//! cached. The [`Ledger`] only appends.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::Checkout;
use crate::catalog::{MAX_UNITS, Product};
use crate::types::{AmountOverflow, MAX_UNIT_PRICE, Price, ProductId, TransactionId};
use crate::validation::{ValidationError, require};

// =============================================================================
// Transactions
// =============================================================================

/// One itemized line of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub invoice_number: String,
    pub lines: Vec<SaleLine>,
    pub total: Price,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Record a point-of-sale checkout.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if a line total does not fit.
    pub fn from_checkout(
        id: TransactionId,
        checkout: Checkout<Product>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, AmountOverflow> {
        let mut lines = Vec::with_capacity(checkout.lines.len());
        for line in checkout.lines {
            let line_total = line.line_total()?;
            lines.push(SaleLine {
                product_id: line.item.id,
                name: line.item.name,
                quantity: line.quantity,
                unit_price: line.item.price,
                line_total,
            });
        }

        Ok(Self {
            id,
            invoice_number: invoice_number(id, timestamp),
            lines,
            total: checkout.total,
            timestamp,
        })
    }
}

/// `INV-<yyyymmdd>-<id>`, with the ID zero-padded to five digits.
#[must_use]
pub fn invoice_number(id: TransactionId, timestamp: DateTime<Utc>) -> String {
    format!("INV-{}-{:05}", timestamp.format("%Y%m%d"), id.as_i32())
}

/// A line of an itemized sale submitted from outside the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDraft {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// An itemized sale submitted from outside the cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub lines: Vec<SaleLineDraft>,
}

impl TransactionDraft {
    /// Validate and price the draft.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty sale or a blank name, and
    /// for a quantity or unit price outside `1..=MAX_UNITS` and
    /// `0..=MAX_UNIT_PRICE`.
    pub fn into_transaction(
        self,
        id: TransactionId,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::Required { field: "lines" });
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        for draft in self.lines {
            let name = require("name", &draft.name)?.to_owned();
            if draft.quantity == 0 {
                return Err(ValidationError::invalid("quantity", "must be at least 1"));
            }
            if draft.quantity > MAX_UNITS {
                return Err(ValidationError::invalid(
                    "quantity",
                    format!("must not exceed {MAX_UNITS}"),
                ));
            }
            let unit_price = Price::from_amount(draft.unit_price);
            if unit_price.is_negative() {
                return Err(ValidationError::invalid("unitPrice", "must not be negative"));
            }
            if unit_price.amount > MAX_UNIT_PRICE {
                return Err(ValidationError::invalid(
                    "unitPrice",
                    format!("must not exceed {MAX_UNIT_PRICE}"),
                ));
            }
            let line_total = unit_price
                .times(draft.quantity)
                .map_err(|_| ValidationError::invalid("lines", "total is out of range"))?;
            lines.push(SaleLine {
                product_id: draft.product_id,
                name,
                quantity: draft.quantity,
                unit_price,
                line_total,
            });
        }

        let total = Price::checked_sum(lines.iter().map(|line| line.line_total))
            .map_err(|_| ValidationError::invalid("lines", "total is out of range"))?;
        Ok(Transaction {
            id,
            invoice_number: invoice_number(id, timestamp),
            lines,
            total,
            timestamp,
        })
    }
}

/// Append-only sales ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    next_id: i32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Ledger {
    #[must_use]
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let next_id = transactions
            .iter()
            .map(|t| t.id.as_i32())
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            transactions,
            next_id,
        }
    }

    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    #[must_use]
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    fn take_id(&mut self) -> TransactionId {
        let id = TransactionId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Append a point-of-sale checkout.
    ///
    /// # Errors
    ///
    /// Returns [`AmountOverflow`] if a line total does not fit. No ID is
    /// consumed in that case.
    pub fn record_checkout(
        &mut self,
        checkout: Checkout<Product>,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, AmountOverflow> {
        let transaction =
            Transaction::from_checkout(TransactionId::new(self.next_id), checkout, timestamp)?;
        self.take_id();
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Append a submitted sale.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is rejected. No ID is
    /// consumed in that case.
    pub fn record(
        &mut self,
        draft: TransactionDraft,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, ValidationError> {
        let transaction = draft.into_transaction(TransactionId::new(self.next_id), timestamp)?;
        self.take_id();
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }
}

// =============================================================================
// Rollups
// =============================================================================

/// Reporting window, anchored on an `as_of` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The `as_of` calendar date.
    #[default]
    Daily,
    /// The calendar month containing `as_of`.
    Monthly,
}

impl Period {
    /// Whether `timestamp` falls in this period around `as_of`.
    #[must_use]
    pub fn contains(&self, as_of: NaiveDate, timestamp: DateTime<Utc>) -> bool {
        let date = timestamp.date_naive();
        match self {
            Self::Daily => date == as_of,
            Self::Monthly => date.year() == as_of.year() && date.month() == as_of.month(),
        }
    }

    /// An anchor date inside the period immediately before this one.
    #[must_use]
    pub fn previous(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => as_of.pred_opt(),
            Self::Monthly => as_of.with_day(1)?.checked_sub_months(Months::new(1)),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("invalid period: {s}")),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Units sold and revenue for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u64,
    pub revenue: Price,
}

/// Headline sales figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total: Price,
    pub transaction_count: usize,
    /// `total / transaction_count`, rounded to two places. Zero when there
    /// are no transactions.
    pub average_order: Price,
    /// Highest revenue first; ties keep the order products were first sold.
    pub top_products: Vec<ProductSales>,
}

/// Roll up `transactions`, keeping the `top_n` best-selling products.
///
/// # Errors
///
/// Returns [`AmountOverflow`] if the revenue does not fit.
pub fn summarize(
    transactions: &[&Transaction],
    top_n: usize,
) -> Result<SalesSummary, AmountOverflow> {
    let total = Price::checked_sum(transactions.iter().map(|t| t.total))?;
    let transaction_count = transactions.len();

    let average_order = match Decimal::from(transaction_count) {
        count if count.is_zero() => Price::zero(total.currency_code),
        count => Price::new(
            (total.amount / count).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            total.currency_code,
        ),
    };

    let mut products: Vec<ProductSales> = Vec::new();
    for line in transactions.iter().flat_map(|t| &t.lines) {
        if let Some(entry) = products.iter_mut().find(|p| p.product_id == line.product_id) {
            entry.quantity += u64::from(line.quantity);
            entry.revenue = entry.revenue.checked_add(line.line_total)?;
        } else {
            products.push(ProductSales {
                product_id: line.product_id,
                name: line.name.clone(),
                quantity: u64::from(line.quantity),
                revenue: line.line_total,
            });
        }
    }
    // Stable sort keeps first-occurrence order among equal revenues.
    products.sort_by(|a, b| b.revenue.amount.cmp(&a.revenue.amount));
    products.truncate(top_n);

    Ok(SalesSummary {
        total,
        transaction_count,
        average_order,
        top_products: products,
    })
}

/// Sales for one period plus growth against the period before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub period: Period,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub summary: SalesSummary,
    /// Percentage change in revenue against the previous period, to one
    /// decimal place. Absent when the previous period had no revenue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth: Option<Decimal>,
}

/// Summarize the transactions in `period` around `as_of`.
///
/// # Errors
///
/// Returns [`AmountOverflow`] if either period's revenue does not fit.
pub fn period_report(
    transactions: &[Transaction],
    period: Period,
    as_of: NaiveDate,
    top_n: usize,
) -> Result<PeriodReport, AmountOverflow> {
    let in_period = |anchor: NaiveDate| -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|t| period.contains(anchor, t.timestamp))
            .collect()
    };

    let summary = summarize(&in_period(as_of), top_n)?;
    let previous_total = match period.previous(as_of) {
        Some(anchor) => Price::checked_sum(in_period(anchor).iter().map(|t| t.total))?.amount,
        None => Decimal::ZERO,
    };

    Ok(PeriodReport {
        period,
        as_of,
        growth: growth(summary.total.amount, previous_total),
        summary,
    })
}

/// `(current - previous) / previous * 100`, to one decimal place.
///
/// `None` when `previous` is zero or the percentage is out of range.
#[must_use]
pub fn growth(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let pct = current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}
