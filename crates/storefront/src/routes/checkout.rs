//! Checkout route handler.
//!
//! The server-side path from cart to payment: the order is derived from the
//! session cart rather than from client-supplied items, so the totals the
//! gateway sees are the ones the server computed.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tiny_sprouts_core::{Address, CurrencyCode};

use crate::cart;
use crate::checkout::{self, CheckoutSession};
use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Request to start checkout from the session cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: Option<Address>,
    pub payment_method: Option<String>,
    pub currency: Option<CurrencyCode>,
}

/// Turn the session cart into a pending order plus a gateway order.
///
/// POST /api/checkout
///
/// The cart stays intact; it is only cleared later, when the payment
/// callback verifies.
///
/// # Errors
///
/// Returns `AppError::Validation` when the address is missing or the cart
/// is empty, `AppError::Database` when order persistence fails, and
/// `AppError::Gateway` when the gateway rejects the order.
#[instrument(skip(state, session, req))]
pub async fn begin(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutSession>>)> {
    let shipping_address = req
        .shipping_address
        .ok_or_else(|| AppError::Validation("Shipping address is required".to_string()))?;

    let cart = cart::load(&session).await;
    let repo = OrderRepository::new(state.pool());

    let checkout_session = checkout::begin(
        &repo,
        state.gateway(),
        &cart,
        user.id,
        shipping_address,
        req.payment_method,
        req.currency.unwrap_or(state.config().razorpay.currency),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(checkout_session)),
    ))
}
