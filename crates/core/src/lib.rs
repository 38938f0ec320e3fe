//! Shared types for the Tiny Sprouts storefront.
//!
//! This crate holds the domain vocabulary used by the storefront binary:
//! typed entity IDs, money/currency, status enums, product records, and the
//! shipping address shape. It deliberately contains no I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod product;
pub mod types;

pub use address::Address;
pub use product::{Category, Product};
pub use types::email::{Email, EmailError};
pub use types::id::{CategoryId, ProductId, UserId};
pub use types::price::{CurrencyCode, to_minor_units};
pub use types::status::{OrderStatus, PaymentStatus};
