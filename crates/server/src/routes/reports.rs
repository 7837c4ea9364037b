//! Sales report route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use inventrak_core::reports::{Period, PeriodReport, period_report};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireReports;
use crate::state::AppState;

/// Top sellers listed when `top` is absent.
pub const DEFAULT_TOP: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: Period,
    pub top: Option<usize>,
    /// Report date; defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

#[instrument(skip(state, _user))]
pub async fn sales(
    State(state): State<AppState>,
    RequireReports(_user): RequireReports,
    Query(query): Query<ReportQuery>,
) -> Result<Json<PeriodReport>> {
    let as_of = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let top = query.top.unwrap_or(DEFAULT_TOP);
    let ledger = state.ledger();
    Ok(Json(period_report(ledger.transactions(), query.period, as_of, top)?))
}
