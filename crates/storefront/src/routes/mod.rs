//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (DB ping)
//!
//! # Products
//! GET  /api/products               - Product listing (category, featured, limit)
//! GET  /api/products/{slug}        - Product detail
//!
//! # Cart (session-backed)
//! GET  /api/cart                   - Cart contents and totals
//! POST /api/cart/add               - Add an item (merges matching lines)
//! POST /api/cart/update            - Set a line's quantity (clamped to >= 1)
//! POST /api/cart/remove            - Remove a line
//! GET  /api/cart/count             - Total item count
//!
//! # Orders (requires auth)
//! POST /api/orders                 - Create an order
//! GET  /api/orders                 - The caller's orders, newest first
//! GET  /api/orders/{id}            - One of the caller's orders
//!
//! # Payment
//! POST /api/payment/create-order   - Create a gateway order (requires auth)
//! POST /api/payment/verify         - Verify a gateway callback (signature-authenticated)
//!
//! # Checkout
//! POST /api/checkout               - Cart -> order -> gateway order (requires auth)
//!
//! # Auth
//! POST /api/auth/register          - Create an account and sign in
//! POST /api/auth/login             - Sign in
//! POST /api/auth/logout            - Sign out
//! GET  /api/auth/me                - The current user
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// The JSON envelope wrapping every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying data.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
        }
    }

    /// A successful response with a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// A successful response annotated with a result count.
    pub fn with_count(data: T, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::ok(data)
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(payments::create_order))
        .route("/verify", post(payments::verify))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/payment", payment_routes())
        .nest("/api/auth", auth_routes())
        .route("/api/checkout", post(checkout::begin))
}
