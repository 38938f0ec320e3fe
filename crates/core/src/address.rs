//! Shipping address embedded in orders.

use serde::{Deserialize, Serialize};

/// A shipping address.
///
/// Addresses are embedded in the order document rather than stored as
/// separate rows; an order keeps the address it was placed with even if the
/// customer later edits their saved addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}
