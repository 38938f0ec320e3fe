//! In-process product catalog.
//!
//! The catalog is the read-only collaborator the cart and product routes
//! draw from. Today it serves seeded sample data (the CMS hookup never
//! landed); the query surface is the piece the rest of the app depends on,
//! so swapping the backing store later only touches `seed_products`.

use rust_decimal::Decimal;
use serde::Deserialize;

use tiny_sprouts_core::{Category, CategoryId, Product, ProductId};

/// Query filters for product listing.
///
/// Filters apply in a fixed order: category first, then featured, then
/// limit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Match against the category slug.
    pub category: Option<String>,
    /// When true, keep only featured products.
    pub featured: Option<bool>,
    /// Truncate the result to at most this many products.
    pub limit: Option<usize>,
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog over the given products, preserving their order.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Create a catalog with the seeded sample products.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_products())
    }

    /// List products matching the filter: category, then featured, then limit.
    #[must_use]
    pub fn list(&self, filter: &ProductFilter) -> Vec<Product> {
        let filtered = self
            .products
            .iter()
            .filter(|p| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|slug| p.category.slug == *slug)
            })
            .filter(|p| filter.featured != Some(true) || p.featured);

        match filter.limit {
            Some(limit) => filtered.take(limit).cloned().collect(),
            None => filtered.cloned().collect(),
        }
    }

    /// Look up a product by its URL slug.
    #[must_use]
    pub fn get_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

fn category(id: i32, name: &str, slug: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Sample product data served until the CMS integration lands.
#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            slug: "cute-pink-dress".to_string(),
            name: "Cute Pink Dress".to_string(),
            description: "Adorable pink dress perfect for parties and special occasions. \
                          Made with soft, breathable fabric."
                .to_string(),
            price: Decimal::from(1299),
            original_price: Some(Decimal::from(1999)),
            category: category(1, "Dresses", "dresses"),
            images: strings(&[
                "https://images.unsplash.com/photo-1518831959646-742c3a14ebf7?w=500",
                "https://images.unsplash.com/photo-1522771739844-6a9f6d5f14af?w=500",
            ]),
            sizes: strings(&["2-3Y", "3-4Y", "4-5Y", "5-6Y"]),
            colors: strings(&["Pink", "White"]),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new(2),
            slug: "boys-casual-tshirt".to_string(),
            name: "Boys Casual T-Shirt".to_string(),
            description: "Comfortable cotton t-shirt for everyday wear. \
                          Available in multiple colors."
                .to_string(),
            price: Decimal::from(499),
            original_price: Some(Decimal::from(799)),
            category: category(2, "T-Shirts", "t-shirts"),
            images: strings(&[
                "https://images.unsplash.com/photo-1581655353564-df123a1eb820?w=500",
            ]),
            sizes: strings(&["2-3Y", "3-4Y", "4-5Y", "5-6Y", "6-7Y"]),
            colors: strings(&["Blue", "Green", "Yellow"]),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new(3),
            slug: "floral-summer-dress".to_string(),
            name: "Floral Summer Dress".to_string(),
            description: "Light and breezy summer dress with beautiful floral prints. \
                          Perfect for hot days."
                .to_string(),
            price: Decimal::from(899),
            original_price: Some(Decimal::from(1499)),
            category: category(1, "Dresses", "dresses"),
            images: strings(&[
                "https://images.unsplash.com/photo-1596783074918-c84cb06531ca?w=500",
            ]),
            sizes: strings(&["2-3Y", "3-4Y", "4-5Y"]),
            colors: strings(&["Multicolor"]),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new(4),
            slug: "denim-jeans-kids".to_string(),
            name: "Kids Denim Jeans".to_string(),
            description: "Durable and stylish denim jeans for active kids. \
                          Comfortable fit with adjustable waist."
                .to_string(),
            price: Decimal::from(1099),
            original_price: None,
            category: category(3, "Jeans", "jeans"),
            images: strings(&[
                "https://images.unsplash.com/photo-1565084888279-aca607ecce0c?w=500",
            ]),
            sizes: strings(&["2-3Y", "3-4Y", "4-5Y", "5-6Y", "6-7Y"]),
            colors: strings(&["Blue", "Black"]),
            in_stock: true,
            featured: false,
        },
        Product {
            id: ProductId::new(5),
            slug: "winter-jacket-kids".to_string(),
            name: "Warm Winter Jacket".to_string(),
            description: "Cozy winter jacket to keep your little one warm. \
                          Water-resistant and windproof."
                .to_string(),
            price: Decimal::from(2499),
            original_price: Some(Decimal::from(3499)),
            category: category(4, "Jackets", "jackets"),
            images: strings(&[
                "https://images.unsplash.com/photo-1591047139829-d91aecb6caea?w=500",
            ]),
            sizes: strings(&["2-3Y", "3-4Y", "4-5Y", "5-6Y"]),
            colors: strings(&["Red", "Navy Blue", "Black"]),
            in_stock: true,
            featured: true,
        },
        Product {
            id: ProductId::new(6),
            slug: "party-frock-pink".to_string(),
            name: "Princess Party Frock".to_string(),
            description: "Stunning party frock with sequins and layers. \
                          Makes your princess feel special."
                .to_string(),
            price: Decimal::from(1899),
            original_price: Some(Decimal::from(2999)),
            category: category(1, "Dresses", "dresses"),
            images: strings(&[
                "https://images.unsplash.com/photo-1594223515816-5c5ca6b363ea?w=500",
            ]),
            sizes: strings(&["2-3Y", "3-4Y", "4-5Y"]),
            colors: strings(&["Pink", "Purple"]),
            in_stock: true,
            featured: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_unfiltered_returns_all() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.list(&ProductFilter::default()).len(), 6);
    }

    #[test]
    fn test_list_filters_by_category_slug() {
        let catalog = Catalog::seeded();
        let dresses = catalog.list(&ProductFilter {
            category: Some("dresses".to_string()),
            ..Default::default()
        });
        assert_eq!(dresses.len(), 3);
        assert!(dresses.iter().all(|p| p.category.slug == "dresses"));
    }

    #[test]
    fn test_list_filters_featured() {
        let catalog = Catalog::seeded();
        let featured = catalog.list(&ProductFilter {
            featured: Some(true),
            ..Default::default()
        });
        assert!(featured.iter().all(|p| p.featured));
        assert_eq!(featured.len(), 4);
    }

    #[test]
    fn test_featured_false_does_not_filter() {
        // Mirrors the query-string semantics: only `featured=true` filters.
        let catalog = Catalog::seeded();
        let all = catalog.list(&ProductFilter {
            featured: Some(false),
            ..Default::default()
        });
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_limit_applies_after_filters() {
        let catalog = Catalog::seeded();
        let result = catalog.list(&ProductFilter {
            category: Some("dresses".to_string()),
            featured: Some(true),
            limit: Some(2),
        });
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.category.slug == "dresses" && p.featured));
    }

    #[test]
    fn test_limit_larger_than_result_is_harmless() {
        let catalog = Catalog::seeded();
        assert_eq!(
            catalog
                .list(&ProductFilter {
                    limit: Some(100),
                    ..Default::default()
                })
                .len(),
            6
        );
    }

    #[test]
    fn test_get_by_slug() {
        let catalog = Catalog::seeded();
        assert!(catalog.get_by_slug("cute-pink-dress").is_some());
        assert!(catalog.get_by_slug("no-such-product").is_none());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::seeded();
        assert_eq!(
            catalog.get(ProductId::new(2)).map(|p| p.slug.as_str()),
            Some("boys-casual-tshirt")
        );
        assert!(catalog.get(ProductId::new(99)).is_none());
    }
}
