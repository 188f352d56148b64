// CategoryRepository
//
// MySQL persistence for categories. Uniqueness of `category_code` is the unique index
// `categories_category_code_unique`; the restrict-on-delete policy is the foreign key
// `products_category_id_foreign ... ON DELETE RESTRICT`. Neither is checked in
// application code first, so racing writers are decided by the database.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::categories::models::{Category, CategorySummary, NewCategory};

/// Storage operations for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category; `DuplicateKey` when the code is taken
    async fn create(&self, category: &NewCategory) -> Result<Category>;

    /// Find category by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// All categories ordered by ID, with their product counts
    async fn list(&self) -> Result<Vec<CategorySummary>>;

    /// Persist code and name of an existing category and return the stored row
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Remove a category; `Conflict` while products still reference it
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Category repository backed by MySQL
#[derive(Clone)]
pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn duplicate_code(code: &str) -> AppError {
        AppError::duplicate_key(format!(
            "Category with category_code '{}' already exists",
            code
        ))
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn create(&self, category: &NewCategory) -> Result<Category> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories (category_code, category_name)
            VALUES (?, ?)
            "#,
        )
        .bind(&category.category_code)
        .bind(&category.category_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                || Self::duplicate_code(&category.category_code),
                || AppError::internal("Unexpected foreign key violation on categories"),
            )
        })?;

        let id = result.last_insert_id() as i64;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Category {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_code, category_name, created_at, updated_at
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list(&self) -> Result<Vec<CategorySummary>> {
        let categories = sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT c.id, c.category_code, c.category_name, c.created_at, c.updated_at,
                   COUNT(p.id) AS products_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id, c.category_code, c.category_name, c.created_at, c.updated_at
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        sqlx::query(
            r#"
            UPDATE categories
            SET category_code = ?, category_name = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.category_code)
        .bind(&category.category_name)
        .bind(category.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                || Self::duplicate_code(&category.category_code),
                || AppError::internal("Unexpected foreign key violation on categories"),
            )
        })?;

        self.find_by_id(category.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {}", category.id)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_write(
                    e,
                    || AppError::internal("Unexpected unique violation on delete"),
                    || {
                        AppError::conflict(format!(
                            "Category {} still has products and cannot be deleted",
                            id
                        ))
                    },
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Category {}", id)));
        }

        Ok(())
    }
}
