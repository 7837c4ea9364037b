//! Offline reports printed as JSON.

use std::path::Path;

use chrono::NaiveDate;
use inventrak_core::alerts::LowStockBoard;
use inventrak_core::catalog::Catalog;
use inventrak_core::reports::{Period, Transaction, period_report};
use inventrak_core::seed;
use inventrak_server::ServerConfig;

use super::CommandError;

/// Low-stock report for the seed catalog, using the urgency cut-offs from
/// the environment.
///
/// # Errors
///
/// Returns an error if the cut-off variables are malformed.
pub fn low_stock() -> Result<String, CommandError> {
    let config = ServerConfig::from_env()?;
    let catalog = Catalog::new(seed::products());
    let board = LowStockBoard::new(seed::notified());
    let report = board.report(&catalog, &config.urgency);
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Sales report over a JSON array of transactions.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its
/// revenue does not fit a decimal.
pub fn sales(
    file: &Path,
    period: Period,
    as_of: NaiveDate,
    top: usize,
) -> Result<String, CommandError> {
    let raw = std::fs::read(file).map_err(|source| CommandError::Read {
        path: file.display().to_string(),
        source,
    })?;
    let transactions: Vec<Transaction> = serde_json::from_slice(&raw)?;
    tracing::info!(count = transactions.len(), %period, %as_of, "Loaded transactions");

    let report = period_report(&transactions, period, as_of, top)?;
    Ok(serde_json::to_string_pretty(&report)?)
}
