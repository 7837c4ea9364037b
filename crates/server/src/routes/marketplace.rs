//! Supplier marketplace route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use inventrak_core::ListingId;
use inventrak_core::marketplace::{Listing, ListingFilter, categories, quantity_to_add};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::pos::AdjustLine;
use super::views::{CartView, RemoveView};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireMarketplace;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListingsView {
    pub listings: Vec<Listing>,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddListing {
    pub listing_id: ListingId,
}

#[instrument(skip(state, _user))]
pub async fn listings(
    State(state): State<AppState>,
    RequireMarketplace(_user): RequireMarketplace,
    Query(filter): Query<ListingFilter>,
) -> Json<ListingsView> {
    let all = state.listings();
    Json(ListingsView {
        listings: filter.apply(all).into_iter().cloned().collect(),
        categories: categories(all),
    })
}

pub async fn cart(
    State(state): State<AppState>,
    RequireMarketplace(_user): RequireMarketplace,
) -> Result<Json<CartView<Listing>>> {
    Ok(Json(CartView::try_from(&*state.marketplace_cart())?))
}

/// Add a listing: its minimum order the first time, one unit after that.
#[instrument(skip(state, _user))]
pub async fn add(
    State(state): State<AppState>,
    RequireMarketplace(_user): RequireMarketplace,
    Json(body): Json<AddListing>,
) -> Result<Json<CartView<Listing>>> {
    let listing = state
        .listings()
        .iter()
        .find(|l| l.id == body.listing_id)
        .ok_or_else(|| AppError::NotFound(format!("listing {}", body.listing_id)))?;

    let mut cart = state.marketplace_cart();
    let units = quantity_to_add(&cart, listing);
    cart.add_item(listing, units)?;
    Ok(Json(CartView::try_from(&*cart)?))
}

#[instrument(skip(state, _user))]
pub async fn adjust(
    State(state): State<AppState>,
    RequireMarketplace(_user): RequireMarketplace,
    Path(id): Path<ListingId>,
    Json(body): Json<AdjustLine>,
) -> Result<Json<CartView<Listing>>> {
    let mut cart = state.marketplace_cart();
    cart.adjust_quantity(id, body.delta)?;
    Ok(Json(CartView::try_from(&*cart)?))
}

pub async fn remove(
    State(state): State<AppState>,
    RequireMarketplace(_user): RequireMarketplace,
    Path(id): Path<ListingId>,
) -> Result<Json<RemoveView<Listing>>> {
    let mut cart = state.marketplace_cart();
    let removed = cart.remove_item(id);
    Ok(Json(RemoveView {
        removed,
        cart: CartView::try_from(&*cart)?,
    }))
}

/// Place the supplier order. Nothing is sent anywhere; the cart is emptied
/// and the order summary returned.
#[instrument(skip(state, _user))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireMarketplace(_user): RequireMarketplace,
) -> Result<Json<CartView<Listing>>> {
    let order = state.marketplace_cart().checkout()?;
    let summary: CartView<Listing> = CartView::try_from(&order)?;
    tracing::info!(lines = summary.line_count, total = %summary.total.amount, "Supplier order placed");
    add_breadcrumb("marketplace", "Supplier order placed", None);
    Ok(Json(summary))
}
