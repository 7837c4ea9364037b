//! Inventory route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use inventrak_core::ProductId;
use inventrak_core::catalog::{CatalogError, InventorySummary, KNOWN_CATEGORIES, Product, ProductDraft};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireInventory;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    pub products: Vec<Product>,
    /// Figures for the whole catalog, not just the search hits.
    pub summary: InventorySummary,
    pub categories: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(flatten)]
    pub draft: ProductDraft,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// List products matching `q` by name or category.
#[instrument(skip(state, _user))]
pub async fn index(
    State(state): State<AppState>,
    RequireInventory(_user): RequireInventory,
    Query(query): Query<SearchQuery>,
) -> Result<Json<InventoryView>> {
    let catalog = state.catalog();
    Ok(Json(InventoryView {
        products: catalog.search_inventory(&query.q).into_iter().cloned().collect(),
        summary: catalog.summary()?,
        categories: KNOWN_CATEGORIES,
    }))
}

#[instrument(skip(state, _user))]
pub async fn show(
    State(state): State<AppState>,
    RequireInventory(_user): RequireInventory,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let catalog = state.catalog();
    let product = catalog.get(id).ok_or(CatalogError::NotFound(id))?;
    Ok(Json(product.clone()))
}

#[instrument(skip(state, _user, draft))]
pub async fn create(
    State(state): State<AppState>,
    RequireInventory(_user): RequireInventory,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog_mut().create(draft)?.clone();
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    add_breadcrumb("inventory", "Product created", Some(&[("product_id", &product.id.to_string())]));
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, _user, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireInventory(_user): RequireInventory,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    let product = state
        .catalog_mut()
        .update(id, body.draft, body.expected_version)?
        .clone();
    tracing::info!(product_id = %id, version = product.version, "Product updated");
    Ok(Json(product))
}

#[instrument(skip(state, _user))]
pub async fn delete(
    State(state): State<AppState>,
    RequireInventory(_user): RequireInventory,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let removed = state.catalog_mut().delete(id)?;
    tracing::info!(product_id = %id, name = %removed.name, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
