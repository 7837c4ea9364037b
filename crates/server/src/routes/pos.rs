//! Point-of-sale route handlers.
//!
//! The POS cart holds product snapshots, re-read from the catalog on every
//! request so stock edits and deletions reach the cart. Checkout records a
//! transaction in the ledger but leaves catalog stock untouched.

use std::sync::MutexGuard;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use inventrak_core::ProductId;
use inventrak_core::cart::Cart;
use inventrak_core::catalog::{CatalogError, Product};
use inventrak_core::reports::Transaction;
use serde::Deserialize;
use tracing::instrument;

use super::inventory::SearchQuery;
use super::views::{CartView, RemoveView};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequirePos;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// The POS cart with every line re-read from the live catalog. Lines for
/// deleted products are dropped.
fn refreshed_cart(state: &AppState) -> MutexGuard<'_, Cart<Product>> {
    let catalog = state.catalog();
    let mut cart = state.pos_cart();
    let dropped = cart.refresh(|id| catalog.get(id).cloned());
    drop(catalog);
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped cart lines for deleted products");
    }
    cart
}

#[derive(Debug, Deserialize)]
pub struct AdjustLine {
    pub delta: i64,
}

/// Products matching `q` by name or barcode.
#[instrument(skip(state, _user))]
pub async fn search(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Product>> {
    let catalog = state.catalog();
    Json(catalog.search_for_sale(&query.q).into_iter().cloned().collect())
}

pub async fn cart(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
) -> Result<Json<CartView<Product>>> {
    Ok(Json(CartView::try_from(&*refreshed_cart(&state))?))
}

#[instrument(skip(state, _user))]
pub async fn add(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
    Json(body): Json<AddToCart>,
) -> Result<Json<CartView<Product>>> {
    let product = state
        .catalog()
        .get(body.product_id)
        .cloned()
        .ok_or(CatalogError::NotFound(body.product_id))?;

    let mut cart = refreshed_cart(&state);
    let quantity = cart.add_item(&product, body.quantity)?;
    tracing::debug!(product_id = %product.id, quantity, "Cart line updated");
    Ok(Json(CartView::try_from(&*cart)?))
}

#[instrument(skip(state, _user))]
pub async fn adjust(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
    Path(id): Path<ProductId>,
    Json(body): Json<AdjustLine>,
) -> Result<Json<CartView<Product>>> {
    let mut cart = refreshed_cart(&state);
    cart.adjust_quantity(id, body.delta)?;
    Ok(Json(CartView::try_from(&*cart)?))
}

pub async fn remove(
    State(state): State<AppState>,
    RequirePos(_user): RequirePos,
    Path(id): Path<ProductId>,
) -> Result<Json<RemoveView<Product>>> {
    let mut cart = refreshed_cart(&state);
    let removed = cart.remove_item(id);
    Ok(Json(RemoveView {
        removed,
        cart: CartView::try_from(&*cart)?,
    }))
}

/// Complete the sale: empty the cart and record a transaction.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequirePos(user): RequirePos,
) -> Result<(StatusCode, Json<Transaction>)> {
    let checkout = refreshed_cart(&state).checkout()?;
    let transaction = state.ledger_mut().record_checkout(checkout, Utc::now())?;

    tracing::info!(
        invoice = %transaction.invoice_number,
        total = %transaction.total.amount,
        lines = transaction.lines.len(),
        "Sale completed"
    );
    add_breadcrumb(
        "pos",
        "Sale completed",
        Some(&[("invoice", &transaction.invoice_number)]),
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}
