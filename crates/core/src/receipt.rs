//! Printable receipt data.
//!
//! A [`Receipt`] is the view of a [`Transaction`] handed to the receipt
//! renderer. Rendering itself lives with the HTTP layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::reports::Transaction;
use crate::types::Price;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Everything printed on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub invoice_id: String,
    pub timestamp: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub total: Price,
}

impl Receipt {
    /// Timestamp as printed, e.g. `15 Jan 2024, 10:30 UTC`.
    #[must_use]
    pub fn printed_at(&self) -> String {
        self.timestamp.format("%d %b %Y, %H:%M UTC").to_string()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

impl From<&Transaction> for Receipt {
    fn from(transaction: &Transaction) -> Self {
        Self {
            invoice_id: transaction.invoice_number.clone(),
            timestamp: transaction.timestamp,
            lines: transaction
                .lines
                .iter()
                .map(|line| ReceiptLine {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    line_total: line.line_total,
                })
                .collect(),
            total: transaction.total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;
    use crate::reports::{Ledger, SaleLineDraft, TransactionDraft};
    use crate::types::ProductId;

    #[test]
    fn test_receipt_from_transaction() {
        let mut ledger = Ledger::default();
        let when = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let tx = ledger
            .record(
                TransactionDraft {
                    lines: vec![SaleLineDraft {
                        product_id: ProductId::new(1),
                        name: "Rice 1kg".to_string(),
                        quantity: 3,
                        unit_price: Decimal::from(80),
                    }],
                },
                when,
            )
            .unwrap();

        let receipt = Receipt::from(&tx);
        assert_eq!(receipt.invoice_id, "INV-20240115-00001");
        assert_eq!(receipt.printed_at(), "15 Jan 2024, 10:30 UTC");
        assert_eq!(receipt.item_count(), 3);
        assert_eq!(receipt.lines[0].line_total.display(), "₹240.00");
        assert_eq!(receipt.total.amount, Decimal::from(240));
    }
}
