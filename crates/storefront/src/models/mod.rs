//! Domain models for the storefront.

pub mod order;
pub mod user;

pub use order::{NewOrder, Order, OrderItem, generate_order_number};
pub use user::{CurrentUser, User};

/// Session storage keys.
///
/// All session reads and writes go through these constants so a key typo
/// cannot silently split state across two slots.
pub mod session_keys {
    /// The serialized cart line sequence. The fixed key mirrors the slot the
    /// web client previously used for its persisted cart.
    pub const CART: &str = "cart-storage";

    /// The authenticated user, set at login and removed at logout.
    pub const CURRENT_USER: &str = "current_user";
}
