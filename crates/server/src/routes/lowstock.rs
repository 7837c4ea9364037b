//! Low-stock alert route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use inventrak_core::ProductId;
use inventrak_core::alerts::LowStockReport;
use serde::Serialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireLowStock;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NotifyAllView {
    /// Items newly marked by this call.
    pub marked: usize,
    pub report: LowStockReport,
}

fn current_report(state: &AppState) -> LowStockReport {
    let catalog = state.catalog();
    state.low_stock().report(&catalog, state.urgency())
}

pub async fn report(
    State(state): State<AppState>,
    RequireLowStock(_user): RequireLowStock,
) -> Json<LowStockReport> {
    Json(current_report(&state))
}

/// Mark one low-stock product as having its supplier notified.
#[instrument(skip(state, _user))]
pub async fn notify(
    State(state): State<AppState>,
    RequireLowStock(_user): RequireLowStock,
    Path(id): Path<ProductId>,
) -> Result<Json<LowStockReport>> {
    {
        let catalog = state.catalog();
        state.low_stock().mark_notified(&catalog, id)?;
    }
    tracing::info!(product_id = %id, "Supplier notified");
    add_breadcrumb("lowstock", "Supplier notified", Some(&[("product_id", &id.to_string())]));
    Ok(Json(current_report(&state)))
}

#[instrument(skip(state, _user))]
pub async fn notify_all(
    State(state): State<AppState>,
    RequireLowStock(_user): RequireLowStock,
) -> Json<NotifyAllView> {
    let marked = {
        let catalog = state.catalog();
        state.low_stock().mark_all(&catalog)
    };
    tracing::info!(marked, "All suppliers notified");
    Json(NotifyAllView {
        marked,
        report: current_report(&state),
    })
}
