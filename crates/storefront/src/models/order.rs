//! Order models.
//!
//! An order is a persisted record of one checkout attempt. Its line items
//! are a frozen copy of the cart at creation time; they are never re-derived
//! from the (mutable) cart afterwards.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiny_sprouts_core::{Address, OrderStatus, PaymentStatus, ProductId, UserId};

/// One frozen line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the order was placed.
    pub price: Decimal,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    /// Primary product image, kept for order-history rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A persisted order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: UserId,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub shipping_address: Address,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// Gateway-side order handle, set once payment is verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    /// Gateway-side payment handle, set once payment is verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs for creating an order.
///
/// New orders always start in `pending`/`processing`; the statuses are not
/// caller-supplied.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub shipping_address: Address,
    pub payment_method: String,
}

/// Generate a unique order number: `ORD` + epoch millis + random suffix.
///
/// Uniqueness is enforced by the database; the random suffix only
/// disambiguates orders created in the same millisecond.
#[must_use]
pub fn generate_order_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = rand::rng().random_range(0..1000);
    format!("ORD{millis}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert!(number.starts_with("ORD"));
        assert!(number.len() > "ORD".len());
        assert!(
            number
                .strip_prefix("ORD")
                .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
        );
    }

    #[test]
    fn test_order_numbers_vary() {
        // Not a uniqueness proof, just a sanity check that the suffix moves.
        let numbers: std::collections::HashSet<String> =
            (0..50).map(|_| generate_order_number()).collect();
        assert!(numbers.len() > 1);
    }
}
