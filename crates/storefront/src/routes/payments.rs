//! Payment route handlers.
//!
//! `create_order` opens a gateway order for an amount the client supplies in
//! major units (rupees); the handler converts to paise. `verify` is the
//! gateway callback: it carries no session requirement because the HMAC
//! signature is the authenticity control, but it still reads the browser
//! session so a verified payment clears that session's cart.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use tiny_sprouts_core::{CurrencyCode, to_minor_units};

use crate::cart;
use crate::checkout::{self, PaymentCallback};
use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::payments::PaymentGateway;
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Request to create a gateway order.
#[derive(Debug, Deserialize)]
pub struct CreateGatewayOrderRequest {
    /// Amount in major units (rupees).
    pub amount: Option<Decimal>,
    /// Defaults to the configured storefront currency.
    pub currency: Option<CurrencyCode>,
}

/// What the browser widget needs to collect the payment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderResponse {
    pub order_id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// Create a gateway order for the given amount.
///
/// POST /api/payment/create-order
///
/// # Errors
///
/// Returns `AppError::Validation` when the amount is missing or out of
/// range, and `AppError::Gateway` when the gateway rejects the request.
#[instrument(skip(state, _user))]
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(req): Json<CreateGatewayOrderRequest>,
) -> Result<Json<ApiResponse<GatewayOrderResponse>>> {
    let amount = req
        .amount
        .ok_or_else(|| AppError::Validation("Amount is required".to_string()))?;
    let amount_minor = to_minor_units(amount)
        .filter(|minor| *minor > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid amount: {amount}")))?;

    let currency = req
        .currency
        .unwrap_or(state.config().razorpay.currency);

    let receipt = format!("receipt_{}", uuid::Uuid::new_v4().simple());
    let gateway_order = state
        .gateway()
        .create_order(amount_minor, currency, &receipt)
        .await?;

    Ok(Json(ApiResponse::ok(GatewayOrderResponse {
        order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency: gateway_order.currency,
        key_id: state.gateway().key_id().to_string(),
    })))
}

/// Verify a signed payment callback.
///
/// POST /api/payment/verify
///
/// On success the order is marked paid and this session's cart is cleared.
///
/// # Errors
///
/// Returns `AppError::Authenticity` on a signature mismatch,
/// `AppError::NotFound` when the referenced order does not exist, and
/// `AppError::Database` when the status update fails.
#[instrument(skip(state, session, callback))]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Json(callback): Json<PaymentCallback>,
) -> Result<Json<ApiResponse<Order>>> {
    let repo = OrderRepository::new(state.pool());
    let mut cart = cart::load(&session).await;

    let order = checkout::complete(&repo, state.gateway(), &mut cart, &callback).await?;

    // complete() only clears the cart on the success path; persist the
    // cleared state back to the session.
    cart::save(&session, &cart).await;

    Ok(Json(ApiResponse::with_message(
        order,
        "Payment verified successfully",
    )))
}
