//! Checkout orchestration.
//!
//! The one multi-step workflow in the system: cart → order → gateway order →
//! signature verification → cart cleared. [`begin`] runs the first half
//! (guard, create the order, create the gateway order) and hands control to
//! the gateway's browser UI; [`complete`] runs when the gateway calls back
//! with a signed payment.
//!
//! Failure semantics, deliberately simple:
//!
//! - Order creation fails → nothing was written, resubmitting is safe.
//! - Gateway-order creation fails → the order stays dangling in `pending`.
//!   There is no compensating cleanup and no expiry; abandoned pending
//!   orders accumulate until someone reconciles them by hand.
//! - Signature mismatch → hard rejection; the order stays `pending` and the
//!   cart is preserved so the customer can retry from scratch (creating a
//!   new order).
//!
//! Invariant: the cart is cleared if and only if verification succeeds. No
//! other path clears it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiny_sprouts_core::{Address, CurrencyCode, UserId, to_minor_units};

use crate::cart::Cart;
use crate::db::RepositoryError;
use crate::error::AppError;
use crate::models::{NewOrder, Order, generate_order_number};
use crate::payments::PaymentGateway;

/// Default payment method recorded on orders.
pub const DEFAULT_PAYMENT_METHOD: &str = "razorpay";

/// Seam between the orchestrator and order persistence.
pub trait OrderStore {
    /// Persist a new order in `pending`/`processing` state.
    fn create(&self, order: NewOrder) -> impl Future<Output = Result<Order, RepositoryError>> + Send;

    /// Mark an order's payment completed and record the gateway handles.
    /// Returns `None` when no such order exists.
    fn mark_paid(
        &self,
        order_id: Uuid,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;
}

/// Everything the client needs to open the gateway's payment UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub order: Order,
    /// Gateway-side order handle.
    pub gateway_order_id: String,
    /// Amount in minor units (paise), as the gateway expects.
    pub amount: i64,
    pub currency: CurrencyCode,
    /// Publishable key for the gateway's browser widget.
    pub key_id: String,
}

/// The signed callback payload posted by the gateway after payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// Our order ID, threaded through the gateway UI.
    pub order_id: Uuid,
}

/// Drive checkout steps 1-3: guard, create the order, create the gateway
/// order.
///
/// The caller guarantees an authenticated session; the empty-cart guard
/// lives here. The order is created from a frozen snapshot of the cart, so
/// later cart mutations cannot change it.
///
/// # Errors
///
/// - [`AppError::Validation`] when the cart is empty.
/// - [`AppError::Database`] when order persistence fails (nothing written).
/// - [`AppError::Gateway`] when the gateway rejects the order; the local
///   order remains `pending` with no gateway handle.
pub async fn begin<S, G>(
    store: &S,
    gateway: &G,
    cart: &Cart,
    user_id: UserId,
    shipping_address: Address,
    payment_method: Option<String>,
    currency: CurrencyCode,
) -> Result<CheckoutSession, AppError>
where
    S: OrderStore,
    G: PaymentGateway,
{
    if cart.is_empty() {
        return Err(AppError::Validation("Cart is empty".to_string()));
    }

    let total = cart.total_price();
    let amount_minor = to_minor_units(total)
        .ok_or_else(|| AppError::Internal(format!("cart total out of range: {total}")))?;

    let order = store
        .create(NewOrder {
            user_id,
            order_number: generate_order_number(),
            items: cart.snapshot_items(),
            total_amount: total,
            shipping_address,
            payment_method: payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        })
        .await?;

    let receipt = format!("receipt_{}", order.order_number);
    let gateway_order = gateway.create_order(amount_minor, currency, &receipt).await?;

    tracing::info!(
        order_number = %order.order_number,
        gateway_order_id = %gateway_order.id,
        "Checkout started"
    );

    Ok(CheckoutSession {
        order,
        gateway_order_id: gateway_order.id,
        amount: gateway_order.amount,
        currency,
        key_id: gateway.key_id().to_string(),
    })
}

/// Drive checkout steps 5-6: verify the callback signature, mark the order
/// paid, clear the cart.
///
/// The signature is the sole authenticity control; no session is required.
/// The cart is cleared only on the success path.
///
/// # Errors
///
/// - [`AppError::Authenticity`] when the signature does not verify; the
///   order and cart are untouched.
/// - [`AppError::NotFound`] when the referenced order does not exist.
/// - [`AppError::Database`] when the status update fails.
pub async fn complete<S, G>(
    store: &S,
    gateway: &G,
    cart: &mut Cart,
    callback: &PaymentCallback,
) -> Result<Order, AppError>
where
    S: OrderStore,
    G: PaymentGateway,
{
    if !gateway.verify(
        &callback.razorpay_order_id,
        &callback.razorpay_payment_id,
        &callback.razorpay_signature,
    ) {
        tracing::warn!(order_id = %callback.order_id, "Payment signature mismatch");
        return Err(AppError::Authenticity(
            "Payment verification failed".to_string(),
        ));
    }

    let order = store
        .mark_paid(
            callback.order_id,
            &callback.razorpay_order_id,
            &callback.razorpay_payment_id,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    cart.clear();

    tracing::info!(order_number = %order.order_number, "Payment verified");

    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;
    use rust_decimal::Decimal;

    use tiny_sprouts_core::{OrderStatus, PaymentStatus};

    use crate::cart::tests::product;
    use crate::payments::{GatewayError, GatewayOrder, sign};

    const SECRET: &str = "k9Qw2mXz7vLp4rTy";

    /// In-memory order store mirroring the repository's status handling.
    #[derive(Default)]
    struct MemoryOrders {
        orders: Mutex<Vec<Order>>,
        fail_create: AtomicBool,
    }

    impl MemoryOrders {
        fn get(&self, id: Uuid) -> Option<Order> {
            self.orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.id == id)
                .cloned()
        }
    }

    impl OrderStore for MemoryOrders {
        async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
            }
            let now = Utc::now();
            let order = Order {
                id: Uuid::new_v4(),
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
                created_at: now,
                updated_at: now,
            };
            self.orders.lock().unwrap().push(order.clone());
            Ok(order)
        }

        async fn mark_paid(
            &self,
            order_id: Uuid,
            gateway_order_id: &str,
            gateway_payment_id: &str,
        ) -> Result<Option<Order>, RepositoryError> {
            let mut orders = self.orders.lock().unwrap();
            let Some(order) = orders.iter_mut().find(|o| o.id == order_id) else {
                return Ok(None);
            };
            order.payment_status = PaymentStatus::Completed;
            order.razorpay_order_id = Some(gateway_order_id.to_string());
            order.razorpay_payment_id = Some(gateway_payment_id.to_string());
            order.updated_at = Utc::now();
            Ok(Some(order.clone()))
        }
    }

    /// Gateway double that signs with a fixed secret, optionally failing
    /// order creation.
    struct FakeGateway {
        fail_create: bool,
    }

    impl FakeGateway {
        const fn ok() -> Self {
            Self { fail_create: false }
        }

        const fn failing() -> Self {
            Self { fail_create: true }
        }
    }

    impl PaymentGateway for FakeGateway {
        async fn create_order(
            &self,
            amount_minor: i64,
            currency: CurrencyCode,
            _receipt: &str,
        ) -> Result<GatewayOrder, GatewayError> {
            if self.fail_create {
                return Err(GatewayError::Api {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "gateway down".to_string(),
                });
            }
            Ok(GatewayOrder {
                id: "order_gw123".to_string(),
                amount: amount_minor,
                currency: currency.code().to_string(),
            })
        }

        fn key_id(&self) -> &str {
            "rzp_test_abc123"
        }

        fn verify(
            &self,
            gateway_order_id: &str,
            gateway_payment_id: &str,
            signature: &str,
        ) -> bool {
            crate::payments::verify_signature(
                gateway_order_id,
                gateway_payment_id,
                signature,
                SECRET,
            )
        }
    }

    fn address() -> Address {
        Address {
            full_name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            address_line1: "12 MG Road".to_string(),
            address_line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
        }
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::default();
        cart.add_item(product(1, 1299), 2, "3-4Y", "Red");
        cart.add_item(product(2, 499), 1, "2-3Y", "Blue");
        cart
    }

    #[tokio::test]
    async fn test_begin_rejects_empty_cart() {
        let store = MemoryOrders::default();
        let cart = Cart::default();

        let result = begin(
            &store,
            &FakeGateway::ok(),
            &cart,
            UserId::new(1),
            address(),
            None,
            CurrencyCode::INR,
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_begin_creates_pending_order_and_gateway_handle() {
        let store = MemoryOrders::default();
        let cart = filled_cart();

        let session = begin(
            &store,
            &FakeGateway::ok(),
            &cart,
            UserId::new(1),
            address(),
            None,
            CurrencyCode::INR,
        )
        .await
        .unwrap();

        // 2 * 1299 + 499 = 3097 rupees = 309700 paise
        assert_eq!(session.amount, 309_700);
        assert_eq!(session.gateway_order_id, "order_gw123");
        assert_eq!(session.key_id, "rzp_test_abc123");
        assert_eq!(session.order.payment_status, PaymentStatus::Pending);
        assert_eq!(session.order.order_status, OrderStatus::Processing);
        assert_eq!(session.order.total_amount, Decimal::from(3097));
        assert_eq!(session.order.payment_method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(session.order.items.len(), 2);
    }

    #[tokio::test]
    async fn test_begin_order_failure_writes_nothing() {
        let store = MemoryOrders::default();
        store.fail_create.store(true, Ordering::SeqCst);
        let cart = filled_cart();

        let result = begin(
            &store,
            &FakeGateway::ok(),
            &cart,
            UserId::new(1),
            address(),
            None,
            CurrencyCode::INR,
        )
        .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_begin_gateway_failure_leaves_dangling_pending_order() {
        let store = MemoryOrders::default();
        let cart = filled_cart();

        let result = begin(
            &store,
            &FakeGateway::failing(),
            &cart,
            UserId::new(1),
            address(),
            None,
            CurrencyCode::INR,
        )
        .await;

        assert!(matches!(result, Err(AppError::Gateway(_))));

        // The accepted inconsistency: the order exists, pending, no handles.
        let orders = store.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].payment_status, PaymentStatus::Pending);
        assert!(orders[0].razorpay_order_id.is_none());
    }

    #[tokio::test]
    async fn test_complete_success_marks_paid_and_clears_cart() {
        let store = MemoryOrders::default();
        let mut cart = filled_cart();

        let session = begin(
            &store,
            &FakeGateway::ok(),
            &cart,
            UserId::new(1),
            address(),
            None,
            CurrencyCode::INR,
        )
        .await
        .unwrap();

        let callback = PaymentCallback {
            razorpay_order_id: session.gateway_order_id.clone(),
            razorpay_payment_id: "pay_77".to_string(),
            razorpay_signature: sign(&session.gateway_order_id, "pay_77", SECRET),
            order_id: session.order.id,
        };

        let order = complete(&store, &FakeGateway::ok(), &mut cart, &callback)
            .await
            .unwrap();

        assert_eq!(order.payment_status, PaymentStatus::Completed);
        assert_eq!(order.razorpay_order_id.as_deref(), Some("order_gw123"));
        assert_eq!(order.razorpay_payment_id.as_deref(), Some("pay_77"));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_complete_signature_mismatch_preserves_order_and_cart() {
        let store = MemoryOrders::default();
        let mut cart = filled_cart();

        let session = begin(
            &store,
            &FakeGateway::ok(),
            &cart,
            UserId::new(1),
            address(),
            None,
            CurrencyCode::INR,
        )
        .await
        .unwrap();

        let callback = PaymentCallback {
            razorpay_order_id: session.gateway_order_id.clone(),
            razorpay_payment_id: "pay_77".to_string(),
            razorpay_signature: sign("order_forged", "pay_77", SECRET),
            order_id: session.order.id,
        };

        let result = complete(&store, &FakeGateway::ok(), &mut cart, &callback).await;

        assert!(matches!(result, Err(AppError::Authenticity(_))));
        assert!(!cart.is_empty());
        let stored = store.get(session.order.id).unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
        assert!(stored.razorpay_payment_id.is_none());
    }

    #[tokio::test]
    async fn test_complete_unknown_order_is_not_found() {
        let store = MemoryOrders::default();
        let mut cart = filled_cart();

        let callback = PaymentCallback {
            razorpay_order_id: "order_gw123".to_string(),
            razorpay_payment_id: "pay_77".to_string(),
            razorpay_signature: sign("order_gw123", "pay_77", SECRET),
            order_id: Uuid::new_v4(),
        };

        let result = complete(&store, &FakeGateway::ok(), &mut cart, &callback).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        // Verification passed but the update found nothing; the cart must
        // survive because no order reached `completed`.
        assert!(!cart.is_empty());
    }
}
