//! Order repository.
//!
//! Orders persist the frozen line items and shipping address as JSONB
//! documents; the statuses live in TEXT columns round-tripped through the
//! core status enums. Rows that fail to decode surface as `DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use tiny_sprouts_core::{Address, OrderStatus, PaymentStatus, UserId};

use super::RepositoryError;
use crate::checkout::OrderStore;
use crate::models::{NewOrder, Order, OrderItem};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order in `pending`/`processing` state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// duplicate order number) and `RepositoryError::DataCorruption` if the
    /// items or address cannot be serialized.
    pub async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let items = serde_json::to_value(&new.items).map_err(|e| {
            RepositoryError::DataCorruption(format!("unserializable order items: {e}"))
        })?;
        let shipping_address = serde_json::to_value(&new.shipping_address).map_err(|e| {
            RepositoryError::DataCorruption(format!("unserializable address: {e}"))
        })?;

        let row = sqlx::query(
            r"
            INSERT INTO orders
                (user_id, order_number, items, total_amount, shipping_address,
                 payment_method, payment_status, order_status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', 'processing')
            RETURNING id, created_at, updated_at
            ",
        )
        .bind(new.user_id)
        .bind(&new.order_number)
        .bind(&items)
        .bind(new.total_amount)
        .bind(&shipping_address)
        .bind(&new.payment_method)
        .fetch_one(self.pool)
        .await?;

        Ok(Order {
            id: row.try_get("id")?,
            user_id: new.user_id,
            order_number: new.order_number,
            items: new.items,
            total_amount: new.total_amount,
            shipping_address: new.shipping_address,
            payment_method: new.payment_method,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Processing,
            razorpay_order_id: None,
            razorpay_payment_id: None,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if the row cannot be decoded.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails and
    /// `RepositoryError::DataCorruption` if a row cannot be decoded.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    /// Mark an order's payment completed and record the gateway handles.
    ///
    /// Returns `None` when no such order exists. Re-running with the same
    /// identifiers re-sets the same fields, so a replayed callback is
    /// harmless.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails and
    /// `RepositoryError::DataCorruption` if the row cannot be decoded.
    pub async fn mark_paid(
        &self,
        order_id: Uuid,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(
            r"
            UPDATE orders
            SET payment_status = 'completed',
                razorpay_order_id = $2,
                razorpay_payment_id = $3,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(order_id)
        .bind(gateway_order_id)
        .bind(gateway_payment_id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }
}

impl OrderStore for OrderRepository<'_> {
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        Self::create(self, order).await
    }

    async fn mark_paid(
        &self,
        order_id: Uuid,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        Self::mark_paid(self, order_id, gateway_order_id, gateway_payment_id).await
    }
}

/// Decode an order row.
fn order_from_row(row: &PgRow) -> Result<Order, RepositoryError> {
    let items: serde_json::Value = row.try_get("items")?;
    let items: Vec<OrderItem> = serde_json::from_value(items)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid order items: {e}")))?;

    let shipping_address: serde_json::Value = row.try_get("shipping_address")?;
    let shipping_address: Address = serde_json::from_value(shipping_address)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid address: {e}")))?;

    let payment_status: String = row.try_get("payment_status")?;
    let payment_status: PaymentStatus = payment_status
        .parse()
        .map_err(RepositoryError::DataCorruption)?;

    let order_status: String = row.try_get("order_status")?;
    let order_status: OrderStatus = order_status
        .parse()
        .map_err(RepositoryError::DataCorruption)?;

    Ok(Order {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        order_number: row.try_get("order_number")?,
        items,
        total_amount: row.try_get("total_amount")?,
        shipping_address,
        payment_method: row.try_get("payment_method")?,
        payment_status,
        order_status,
        razorpay_order_id: row.try_get("razorpay_order_id")?,
        razorpay_payment_id: row.try_get("razorpay_payment_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
