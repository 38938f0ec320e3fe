//! The cart store.
//!
//! A cart is an insertion-ordered sequence of lines keyed by
//! (product id, size, color). Totals are recomputed from the lines on every
//! read; they are never stored, so they cannot drift.
//!
//! The cart is owned by the browsing session and persisted under a fixed
//! session key on every mutation. If the session store is unavailable the
//! cart degrades to in-memory for that request; nothing here performs any
//! other I/O, so cart operations themselves cannot fail.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use tiny_sprouts_core::{Product, ProductId};

use crate::models::OrderItem;
use crate::models::session_keys;

/// One cart line: a product in a chosen size and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub size: String,
    pub color: String,
}

impl CartLine {
    fn matches(&self, product_id: ProductId, size: &str, color: &str) -> bool {
        self.product.id == product_id && self.size == size && self.color == color
    }
}

/// The session cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// The cart's lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a product to the cart.
    ///
    /// If a line for the same (product, size, color) already exists its
    /// quantity is incremented; otherwise a new line is appended. No stock
    /// check is performed against `in_stock`.
    pub fn add_item(&mut self, product: Product, quantity: u32, size: &str, color: &str) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product.id, size, color))
        {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine {
                product,
                quantity,
                size: size.to_string(),
                color: color.to_string(),
            });
        }
    }

    /// Remove the matching line. A no-op when no line matches.
    pub fn remove_item(&mut self, product_id: ProductId, size: &str, color: &str) {
        self.lines
            .retain(|line| !line.matches(product_id, size, color));
    }

    /// Set the quantity of the matching line unconditionally.
    ///
    /// Callers are expected to clamp to a minimum of 1 before calling; the
    /// cart itself performs no validation. A no-op when no line matches.
    pub fn set_quantity(&mut self, product_id: ProductId, size: &str, color: &str, quantity: u32) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, size, color))
        {
            line.quantity = quantity;
        }
    }

    /// Empty the cart. Called exactly once, after a verified payment.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total item count: the sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total price: the sum over lines of unit price times quantity.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.product.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Freeze the cart into order items.
    ///
    /// The order keeps this copy; later cart mutations do not touch it.
    #[must_use]
    pub fn snapshot_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product.id,
                name: line.product.name.clone(),
                price: line.product.price,
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
                image: line.product.images.first().cloned(),
            })
            .collect()
    }
}

// =============================================================================
// Session Persistence
// =============================================================================

/// Load the cart from the session.
///
/// A missing slot means a fresh cart. A session-store failure also yields a
/// fresh cart so the request can proceed in-memory; the failure is logged.
pub async fn load(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::default(),
        Err(e) => {
            tracing::warn!("Failed to load cart from session: {e}");
            Cart::default()
        }
    }
}

/// Persist the cart to the session.
///
/// Called after every mutation. On failure the mutation survives in-memory
/// for this request only; the failure is logged, not surfaced.
pub async fn save(session: &Session, cart: &Cart) {
    if let Err(e) = session.insert(session_keys::CART, cart).await {
        tracing::warn!("Failed to persist cart to session: {e}");
    }
}
