// Integration tests for MySqlCategoryRepository
//
// Run against a real MySQL database:
//   TEST_DATABASE_URL=mysql://... cargo test --test category_repository_test -- --ignored

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use rust_decimal_macros::dec;
use stockroom::core::AppError;
use stockroom::modules::categories::models::{NewCategory, UpdateCategoryRequest};
use stockroom::modules::categories::{CategoryRepository, CategoryService, MySqlCategoryRepository};
use stockroom::modules::products::models::NewProduct;
use stockroom::modules::products::{MySqlProductRepository, ProductRepository};

fn new_product(category_id: i64) -> NewProduct {
    NewProduct {
        category_id,
        product_name: "Laptop".to_string(),
        product_code: ProductFactory::unique_code(),
        product_barcode_symbology: "Code128".to_string(),
        product_quantity: 1,
        product_cost: dec!(1.00),
        product_price: dec!(2.00),
        product_unit: None,
        product_stock_alert: 0,
        product_order_tax: 0,
        product_tax_type: 0,
        product_note: None,
    }
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_create_and_find_category() {
    let pool = create_test_pool().await;
    let repo = MySqlCategoryRepository::new(pool.clone());
    let code = CategoryFactory::unique_code();

    let created = repo
        .create(&NewCategory::new(code.clone(), "Electronics").unwrap())
        .await
        .unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.category_code, code);
    assert_eq!(found.category_name, "Electronics");

    cleanup_category(&pool, created.id).await;
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_duplicate_code_is_rejected_by_unique_index() {
    let pool = create_test_pool().await;
    let repo = MySqlCategoryRepository::new(pool.clone());
    let code = CategoryFactory::unique_code();

    let first = repo
        .create(&NewCategory::new(code.clone(), "Electronics").unwrap())
        .await
        .unwrap();
    let second = repo
        .create(&NewCategory::new(code.clone(), "Another Electronics").unwrap())
        .await;

    assert!(matches!(second, Err(AppError::DuplicateKey(_))));

    cleanup_category(&pool, first.id).await;
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_code_differing_only_in_case_is_duplicate() {
    let pool = create_test_pool().await;
    let repo = MySqlCategoryRepository::new(pool.clone());
    let code = CategoryFactory::unique_code();

    let first = repo
        .create(&NewCategory::new(code.clone(), "Electronics").unwrap())
        .await
        .unwrap();
    let upper = repo
        .create(&NewCategory::new(code.to_uppercase(), "Electronics").unwrap())
        .await;

    assert!(matches!(upper, Err(AppError::DuplicateKey(_))));

    cleanup_category(&pool, first.id).await;
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_concurrent_creates_with_same_code_yield_one_row() {
    let pool = create_test_pool().await;
    let repo = Arc::new(MySqlCategoryRepository::new(pool.clone()));
    let code = CategoryFactory::unique_code();

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = repo.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            let category = NewCategory::new(code, format!("Racer {}", i)).unwrap();
            repo.create(&category).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(category) => winners.push(category),
            Err(e) => assert!(matches!(e, AppError::DuplicateKey(_)), "unexpected {}", e),
        }
    }
    assert_eq!(winners.len(), 1);

    cleanup_category(&pool, winners[0].id).await;
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_update_keeps_untouched_fields() {
    let pool = create_test_pool().await;
    let repo = Arc::new(MySqlCategoryRepository::new(pool.clone()));
    let products = Arc::new(MySqlProductRepository::new(pool.clone()));
    let service = CategoryService::new(repo.clone(), products);
    let code = CategoryFactory::unique_code();

    let created = repo
        .create(&NewCategory::new(code.clone(), "Electronics").unwrap())
        .await
        .unwrap();

    let updated = service
        .update_category(
            created.id,
            UpdateCategoryRequest {
                category_code: None,
                category_name: Some("Consumer Electronics".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.category_code, code);
    assert_eq!(updated.category_name, "Consumer Electronics");

    cleanup_category(&pool, created.id).await;
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_delete_is_restricted_while_products_exist() {
    let pool = create_test_pool().await;
    let repo = MySqlCategoryRepository::new(pool.clone());
    let products = MySqlProductRepository::new(pool.clone());

    let category = repo
        .create(&NewCategory::new(CategoryFactory::unique_code(), "Electronics").unwrap())
        .await
        .unwrap();
    let product = products.create(&new_product(category.id)).await.unwrap();

    let result = repo.delete(category.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(repo.find_by_id(category.id).await.unwrap().is_some());

    let listed = repo.list().await.unwrap();
    let summary = listed
        .iter()
        .find(|s| s.category.id == category.id)
        .unwrap();
    assert_eq!(summary.products_count, 1);

    products.delete(product.id).await.unwrap();
    repo.delete(category.id).await.unwrap();
    assert!(repo.find_by_id(category.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires test database
async fn test_delete_missing_category_is_not_found() {
    let pool = create_test_pool().await;
    let repo = MySqlCategoryRepository::new(pool);

    assert!(matches!(
        repo.delete(i64::MAX).await,
        Err(AppError::NotFound(_))
    ));
}
