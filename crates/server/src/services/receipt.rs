//! HTML receipt rendering.

use askama::Template;
use askama_web::WebTemplate;
use inventrak_core::receipt::Receipt;
use inventrak_core::reports::Transaction;

/// Printable receipt page.
#[derive(Template, WebTemplate)]
#[template(path = "receipt.html")]
pub struct ReceiptTemplate {
    pub store_name: String,
    pub receipt: Receipt,
}

impl ReceiptTemplate {
    #[must_use]
    pub fn new(store_name: impl Into<String>, transaction: &Transaction) -> Self {
        Self {
            store_name: store_name.into(),
            receipt: Receipt::from(transaction),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use inventrak_core::ProductId;
    use inventrak_core::reports::{Ledger, SaleLineDraft, TransactionDraft};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_renders_lines_and_total() {
        let mut ledger = Ledger::default();
        let tx = ledger
            .record(
                TransactionDraft {
                    lines: vec![SaleLineDraft {
                        product_id: ProductId::new(6),
                        name: "Biscuits <Pack>".to_string(),
                        quantity: 2,
                        unit_price: Decimal::from(30),
                    }],
                },
                Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            )
            .unwrap();

        let html = ReceiptTemplate::new("Demo Store", &tx).render().unwrap();
        assert!(html.contains("INV-20240115-00001"));
        assert!(html.contains("Demo Store"));
        assert!(html.contains("₹60.00"));
        // Names are escaped.
        assert!(html.contains("Biscuits &#60;Pack&#62;") || html.contains("Biscuits &lt;Pack&gt;"));
    }
}
