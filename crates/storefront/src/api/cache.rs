//! Cache types for catalog API responses.

use crate::models::catalog::{Category, CategoryWithCount, FeaturedProduct, Product};

/// Cached value types, one per cached endpoint.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    FeaturedProducts(Vec<FeaturedProduct>),
    Categories(Vec<Category>),
    CategoryCounts(Vec<CategoryWithCount>),
}
