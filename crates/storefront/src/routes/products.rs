//! Product route handlers.
//!
//! Read-only JSON endpoints over the in-process catalog. Listing applies the
//! filters in a fixed order (category, featured, limit); detail looks up by
//! URL slug.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use tiny_sprouts_core::Product;

use crate::catalog::ProductFilter;
use crate::error::{AppError, Result};
use crate::routes::ApiResponse;
use crate::state::AppState;

/// List products matching the query filters.
///
/// GET /api/products?category=dresses&featured=true&limit=4
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Json<ApiResponse<Vec<Product>>> {
    let products = state.catalog().list(&filter);
    let count = products.len();
    Json(ApiResponse::with_count(products, count))
}

/// Fetch a single product by its URL slug.
///
/// GET /api/products/{slug}
///
/// # Errors
///
/// Returns `AppError::NotFound` when no product has the slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = state
        .catalog()
        .get_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    Ok(Json(ApiResponse::ok(product.clone())))
}
