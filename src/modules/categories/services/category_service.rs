use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::categories::models::{
    Category, CategorySummary, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
use crate::modules::categories::repositories::CategoryRepository;
use crate::modules::products::models::Product;
use crate::modules::products::repositories::ProductRepository;

/// Service for category business logic
pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    product_repo: Arc<dyn ProductRepository>,
}

impl CategoryService {
    pub fn new(
        category_repo: Arc<dyn CategoryRepository>,
        product_repo: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            category_repo,
            product_repo,
        }
    }

    /// Create a category. Code uniqueness is decided by the repository's storage.
    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        let new_category = NewCategory::try_from(request)?;

        match self.category_repo.create(&new_category).await {
            Ok(category) => {
                info!(
                    category_id = category.id,
                    category_code = %category.category_code,
                    "Category created"
                );
                Ok(category)
            }
            Err(e) => {
                warn!(
                    category_code = %new_category.category_code,
                    error = %e,
                    "Failed to create category"
                );
                Err(e)
            }
        }
    }

    /// Get category by ID
    pub async fn get_category(&self, id: i64) -> Result<Category> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {}", id)))
    }

    /// List all categories with their product counts
    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        self.category_repo.list().await
    }

    /// Apply a partial update; untouched fields keep their stored values
    pub async fn update_category(
        &self,
        id: i64,
        changes: UpdateCategoryRequest,
    ) -> Result<Category> {
        let mut category = self.get_category(id).await?;
        category.apply(changes)?;

        let updated = self.category_repo.update(&category).await?;

        info!(
            category_id = updated.id,
            category_code = %updated.category_code,
            "Category updated"
        );

        Ok(updated)
    }

    /// Delete a category; refused while products reference it
    pub async fn delete_category(&self, id: i64) -> Result<()> {
        match self.category_repo.delete(id).await {
            Ok(()) => {
                info!(category_id = id, "Category deleted");
                Ok(())
            }
            Err(e) => {
                warn!(category_id = id, error = %e, "Failed to delete category");
                Err(e)
            }
        }
    }

    /// Every product currently in the category
    pub async fn category_products(&self, id: i64) -> Result<Vec<Product>> {
        let category = self.get_category(id).await?;
        self.product_repo.find_by_category(category.id).await
    }
}
