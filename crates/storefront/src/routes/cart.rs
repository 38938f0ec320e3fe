//! Cart route handlers.
//!
//! The cart lives in the browsing session under a fixed key; every mutation
//! loads it, applies the change, and writes it back. Add validates the
//! product and its size/color options against the catalog; update clamps
//! quantities to a minimum of 1 at this boundary so a zero from the client
//! never reaches the cart.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use tiny_sprouts_core::ProductId;

use crate::cart::{self, Cart, CartLine};
use crate::error::{AppError, Result};
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Cart contents plus the derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_items: u32,
    pub total_price: Decimal,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Request to add a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    /// Defaults to 1 when omitted.
    pub quantity: Option<u32>,
}

/// Request addressing an existing cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

/// Request to set a cart line's quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: u32,
}

/// Item-count payload for the cart badge.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Show the cart.
///
/// GET /api/cart
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<ApiResponse<CartView>> {
    let cart = cart::load(&session).await;
    Json(ApiResponse::ok(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// POST /api/cart/add
///
/// Merges into an existing line when the (product, size, color) triple
/// matches.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the product does not exist and
/// `AppError::Validation` when the size or color is not offered.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartView>>> {
    let product = state
        .catalog()
        .get(req.product_id)
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    if !product.offers_size(&req.size) {
        return Err(AppError::Validation(format!(
            "Size {} is not available for this product",
            req.size
        )));
    }
    if !product.offers_color(&req.color) {
        return Err(AppError::Validation(format!(
            "Color {} is not available for this product",
            req.color
        )));
    }

    let quantity = req.quantity.unwrap_or(1).max(1);

    let mut cart = cart::load(&session).await;
    cart.add_item(product.clone(), quantity, &req.size, &req.color);
    cart::save(&session, &cart).await;

    Ok(Json(ApiResponse::with_message(
        CartView::from(&cart),
        "Item added to cart",
    )))
}

/// Set a cart line's quantity.
///
/// POST /api/cart/update
///
/// The quantity is clamped to a minimum of 1; removing a line goes through
/// `/api/cart/remove`. A missing line is a no-op.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(req): Json<UpdateQuantityRequest>,
) -> Json<ApiResponse<CartView>> {
    let quantity = req.quantity.max(1);

    let mut cart = cart::load(&session).await;
    cart.set_quantity(req.product_id, &req.size, &req.color, quantity);
    cart::save(&session, &cart).await;

    Json(ApiResponse::ok(CartView::from(&cart)))
}

/// Remove a cart line.
///
/// POST /api/cart/remove
///
/// A missing line is a no-op; the response carries the resulting cart either
/// way.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(req): Json<LineRequest>,
) -> Json<ApiResponse<CartView>> {
    let mut cart = cart::load(&session).await;
    cart.remove_item(req.product_id, &req.size, &req.color);
    cart::save(&session, &cart).await;

    Json(ApiResponse::ok(CartView::from(&cart)))
}

/// Total item count, for the header badge.
///
/// GET /api/cart/count
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<ApiResponse<CartCount>> {
    let cart = cart::load(&session).await;
    Json(ApiResponse::ok(CartCount {
        count: cart.total_items(),
    }))
}
