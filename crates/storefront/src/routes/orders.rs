//! Order route handlers.
//!
//! Both endpoints require an authenticated session. Creation accepts the
//! client's frozen line items and total as-is (the checkout endpoint is the
//! path that derives them server-side from the cart); the handler validates
//! presence, not arithmetic.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use tiny_sprouts_core::Address;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewOrder, Order, OrderItem, generate_order_number};
use crate::routes::ApiResponse;
use crate::state::AppState;

/// Request to create an order.
///
/// The fields are optional at the serde layer so that a missing field maps
/// to a 400 with a stable message rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Option<Vec<OrderItem>>,
    pub total_amount: Option<Decimal>,
    pub shipping_address: Option<Address>,
    pub payment_method: Option<String>,
}

/// Create an order from frozen line items.
///
/// POST /api/orders
///
/// The order starts with payment `pending` and fulfilment `processing` and
/// gets a generated order number.
///
/// # Errors
///
/// Returns `AppError::Validation` when items, total or address are missing
/// or the item list is empty, and `AppError::Database` when the insert
/// fails.
#[instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let (Some(items), Some(total_amount), Some(shipping_address)) =
        (req.items, req.total_amount, req.shipping_address)
    else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };
    if items.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let order = OrderRepository::new(state.pool())
        .create(NewOrder {
            user_id: user.id,
            order_number: generate_order_number(),
            items,
            total_amount,
            shipping_address,
            payment_method: req
                .payment_method
                .unwrap_or_else(|| crate::checkout::DEFAULT_PAYMENT_METHOD.to_string()),
        })
        .await?;

    tracing::info!(order_number = %order.order_number, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(order, "Order created successfully")),
    ))
}

/// List the caller's orders, newest first.
///
/// GET /api/orders
///
/// # Errors
///
/// Returns `AppError::Database` when the query fails.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    let count = orders.len();

    Ok(Json(ApiResponse::with_count(orders, count)))
}

/// Fetch one of the caller's orders, for the confirmation view.
///
/// GET /api/orders/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` when the order does not exist or belongs to
/// another user, and `AppError::Database` when the query fails.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(id)
        .await?
        // Another user's order is indistinguishable from a missing one.
        .filter(|order| order.user_id == user.id)
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(Json(ApiResponse::ok(order)))
}
