//! Product catalog types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use huellitas_core::{CategoryId, ProductId, RecordStatus, UnitId};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in the store currency (soles).
    pub unit_price: Decimal,
    /// Relative image path; URL resolution happens in the UI shell.
    pub image_path: Option<String>,
    pub barcode: String,
    /// Units currently available. The cart uses this as the stock ceiling.
    pub stock: u32,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub unit: Option<Unit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The category a product belongs to, as embedded in product payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Unit of measure for a product (bag, can, dose).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
}

/// A product category as returned by the category listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category summary with its product count, for the landing page chips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    pub category_id: CategoryId,
    pub name: String,
    pub product_count: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A product highlighted on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image_path: Option<String>,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    pub stock: u32,
}

/// Filters for the product listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to a single category.
    pub category_id: Option<CategoryId>,
    /// Free-text search over name and description.
    pub search: Option<String>,
}

impl ProductFilter {
    /// Whether any filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.search.is_none()
    }

    /// Query pairs for the request URL.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category_id) = self.category_id {
            query.push(("category_id", category_id.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_filter_empty() {
        assert!(ProductFilter::default().is_empty());
        assert!(ProductFilter::default().to_query().is_empty());
    }

    #[test]
    fn test_product_filter_query_pairs() {
        let filter = ProductFilter {
            category_id: Some(CategoryId::new(3)),
            search: Some("dog food".to_owned()),
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("category_id", "3".to_owned()),
                ("search", "dog food".to_owned())
            ]
        );
    }

    #[test]
    fn test_product_deserializes_without_optional_sections() {
        let json = r#"{
            "id": 1,
            "name": "Foam bed",
            "description": "A comfy bed",
            "unit_price": "79.90",
            "image_path": null,
            "barcode": "7750001000012",
            "stock": 12,
            "created_at": "2025-05-01T10:00:00Z",
            "updated_at": "2025-05-02T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert!(product.category.is_none());
        assert!(product.unit.is_none());
        assert_eq!(product.unit_price.to_string(), "79.90");
    }
}
