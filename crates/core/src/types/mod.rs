//! Primitive domain types: IDs, email, money, statuses.

pub mod email;
pub mod id;
pub mod price;
pub mod status;
