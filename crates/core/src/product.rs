//! Product and category records.
//!
//! Products are owned by the catalog provider and immutable from the cart's
//! perspective. The cart copies the product into its lines; nothing in this
//! crate mutates one after construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Selling price in the store currency's standard unit (rupees).
    pub price: Decimal,
    /// Pre-discount price, shown struck through when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub category: Category,
    /// Ordered image URLs; the first is the primary image.
    pub images: Vec<String>,
    /// Sizes this product is offered in.
    pub sizes: Vec<String>,
    /// Colors this product is offered in.
    pub colors: Vec<String>,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Whether this product is offered in the given size.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether this product is offered in the given color.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}
