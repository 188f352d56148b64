use std::sync::Arc;

use tracing::{info, warn};

use crate::core::money::format_amount;
use crate::core::{AppError, Result};
use crate::modules::products::models::{
    CreateProductRequest, NewProduct, Product, UpdateProductRequest,
};
use crate::modules::products::repositories::{ProductFilter, ProductRepository};

/// Service for product business logic
pub struct ProductService {
    product_repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    /// Create a product. Cost and price are normalized to cents on the way to storage.
    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product> {
        let new_product = NewProduct::try_from(request)?;

        match self.product_repo.create(&new_product).await {
            Ok(product) => {
                info!(
                    product_id = product.id,
                    product_code = %product.product_code,
                    category_id = product.category_id,
                    cost = %format_amount(product.product_cost),
                    price = %format_amount(product.product_price),
                    "Product created"
                );
                Ok(product)
            }
            Err(e) => {
                warn!(
                    product_code = %new_product.product_code,
                    category_id = new_product.category_id,
                    error = %e,
                    "Failed to create product"
                );
                Err(e)
            }
        }
    }

    /// Get product by ID
    pub async fn get_product(&self, id: i64) -> Result<Product> {
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", id)))
    }

    /// List products with pagination
    pub async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>> {
        self.product_repo.list(&filter).await
    }

    /// Apply a partial update. Cost and price are only re-normalized when supplied.
    pub async fn update_product(&self, id: i64, changes: UpdateProductRequest) -> Result<Product> {
        let mut product = self.get_product(id).await?;
        product.apply(changes)?;

        let updated = self.product_repo.update(&product).await?;

        info!(
            product_id = updated.id,
            product_code = %updated.product_code,
            cost = %format_amount(updated.product_cost),
            price = %format_amount(updated.product_price),
            "Product updated"
        );

        Ok(updated)
    }

    /// Delete product
    pub async fn delete_product(&self, id: i64) -> Result<()> {
        self.product_repo.delete(id).await?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }
}
