//! Recorded sales and printable receipts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use inventrak_core::TransactionId;
use inventrak_core::reports::{Transaction, TransactionDraft};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequirePos;
use crate::services::receipt::ReceiptTemplate;
use crate::state::AppState;

/// Record a transaction submitted outside the POS cart.
#[instrument(skip(state, _user, draft))]
pub async fn submit(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
    Json(draft): Json<TransactionDraft>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let transaction = state.ledger_mut().record(draft, Utc::now())?;
    tracing::info!(invoice = %transaction.invoice_number, "Transaction recorded");
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[instrument(skip(state, _user))]
pub async fn show(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
    Path(id): Path<TransactionId>,
) -> Result<Json<Transaction>> {
    let ledger = state.ledger();
    let transaction = ledger
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("transaction {id}")))?;
    Ok(Json(transaction.clone()))
}

/// Printable HTML receipt, headed with the store's name.
#[instrument(skip(state, user))]
pub async fn receipt(
    State(state): State<AppState>,
    RequirePos(user): RequirePos,
    Path(id): Path<TransactionId>,
) -> Result<ReceiptTemplate> {
    let ledger = state.ledger();
    let transaction = ledger
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("transaction {id}")))?;
    Ok(ReceiptTemplate::new(user.company_name, transaction))
}
