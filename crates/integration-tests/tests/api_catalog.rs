//! Integration tests for catalog endpoints.
//!
//! These tests require a running backend with seeded catalog data.
//!
//! Run with: `cargo test -p huellitas-integration-tests -- --ignored`

use huellitas_core::CategoryId;
use huellitas_storefront::models::ProductFilter;

use huellitas_integration_tests::test_client;

#[tokio::test]
#[ignore = "Requires a running backend with seeded catalog data"]
async fn test_product_listing_returns_products() {
    let api = test_client();

    let products = api
        .products(&ProductFilter::default())
        .await
        .expect("Failed to list products");

    assert!(!products.is_empty(), "seeded catalog should not be empty");
    for product in &products {
        assert!(!product.name.is_empty());
    }
}

#[tokio::test]
#[ignore = "Requires a running backend with seeded catalog data"]
async fn test_product_listing_respects_category_filter() {
    let api = test_client();

    let categories = api.categories().await.expect("Failed to list categories");
    let Some(category) = categories.first() else {
        panic!("seeded catalog should have at least one category");
    };

    let filter = ProductFilter {
        category_id: Some(category.id),
        search: None,
    };
    let products = api.products(&filter).await.expect("Failed to filter");

    for product in &products {
        let product_category = product
            .category
            .as_ref()
            .map_or(CategoryId::new(-1), |c| c.id);
        assert_eq!(product_category, category.id);
    }
}

#[tokio::test]
#[ignore = "Requires a running backend with seeded catalog data"]
async fn test_second_listing_is_served_from_cache() {
    let api = test_client();

    let first = api
        .products(&ProductFilter::default())
        .await
        .expect("Failed to list products");
    let second = api
        .products(&ProductFilter::default())
        .await
        .expect("Failed to list products again");

    assert_eq!(first.len(), second.len());
}

#[tokio::test]
#[ignore = "Requires a running backend"]
async fn test_category_counts_and_featured_products() {
    let api = test_client();

    let counts = api
        .categories_with_counts()
        .await
        .expect("Failed to fetch category counts");
    for count in &counts {
        assert!(!count.name.is_empty());
    }

    let featured = api
        .featured_products()
        .await
        .expect("Failed to fetch featured products");
    for product in &featured {
        assert!(!product.name.is_empty());
    }
}

#[tokio::test]
#[ignore = "Requires a running backend"]
async fn test_ubigeo_drilldown() {
    let api = test_client();

    let departments = api.departments().await.expect("Failed to list departments");
    let Some(department) = departments.first() else {
        panic!("ubigeo data should have departments");
    };

    let provinces = api
        .provinces(department)
        .await
        .expect("Failed to list provinces");
    let Some(province) = provinces.first() else {
        panic!("department should have provinces");
    };

    let districts = api
        .districts(province)
        .await
        .expect("Failed to list districts");
    assert!(!districts.is_empty());
    for district in &districts {
        assert!(!district.code.is_empty());
    }
}

#[tokio::test]
#[ignore = "Requires a running backend"]
async fn test_payment_methods_and_document_types() {
    let api = test_client();

    let methods = api
        .payment_methods()
        .await
        .expect("Failed to list payment methods");
    assert!(!methods.is_empty());

    let types = api
        .document_types()
        .await
        .expect("Failed to list document types");
    assert!(!types.is_empty());
}
