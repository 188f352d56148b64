// ProductRepository
//
// MySQL persistence for products. Rows are read as `ProductRow` (cents) and converted
// to `Product` (major units) on the way out; writes convert back through
// `core::money::to_storage`. `product_code` uniqueness and the category reference are
// enforced by the schema.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::products::models::{NewProduct, Product, ProductRow};

/// Default page size for product listings
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Upper bound for a single product listing page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Listing filter for products
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

impl ProductFilter {
    /// Clamp paging to sane bounds
    pub fn new(category_id: Option<i64>, limit: i64, offset: i64) -> Self {
        Self {
            category_id,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: offset.max(0),
        }
    }
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self::new(None, DEFAULT_PAGE_SIZE, 0)
    }
}

/// Storage operations for products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; `DuplicateKey` when the code is taken, `Validation` when
    /// the category does not exist
    async fn create(&self, product: &NewProduct) -> Result<Product>;

    /// Find product by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Page through products, optionally restricted to one category
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    /// Every product currently referencing the category, ordered by ID
    async fn find_by_category(&self, category_id: i64) -> Result<Vec<Product>>;

    /// Persist all assignable columns of an existing product and return the stored row
    async fn update(&self, product: &Product) -> Result<Product>;

    /// Remove a product
    async fn delete(&self, id: i64) -> Result<()>;
}

const SELECT_PRODUCT: &str = r#"
    SELECT id, category_id, product_name, product_code, product_barcode_symbology,
           product_quantity, product_cost, product_price, product_unit,
           product_stock_alert, product_order_tax, product_tax_type, product_note,
           created_at, updated_at
    FROM products
"#;

/// Product repository backed by MySQL
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn duplicate_code(code: &str) -> AppError {
        AppError::duplicate_key(format!(
            "Product with product_code '{}' already exists",
            code
        ))
    }

    fn unknown_category(category_id: i64) -> AppError {
        AppError::validation(format!(
            "category_id {} does not reference an existing category",
            category_id
        ))
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn create(&self, product: &NewProduct) -> Result<Product> {
        let (cost, price) = product.stored_amounts()?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                category_id, product_name, product_code, product_barcode_symbology,
                product_quantity, product_cost, product_price, product_unit,
                product_stock_alert, product_order_tax, product_tax_type, product_note
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.category_id)
        .bind(&product.product_name)
        .bind(&product.product_code)
        .bind(&product.product_barcode_symbology)
        .bind(product.product_quantity)
        .bind(cost)
        .bind(price)
        .bind(&product.product_unit)
        .bind(product.product_stock_alert)
        .bind(product.product_order_tax)
        .bind(product.product_tax_type)
        .bind(&product.product_note)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                || Self::duplicate_code(&product.product_code),
                || Self::unknown_category(product.category_id),
            )
        })?;

        let id = result.last_insert_id() as i64;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Product {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE id = ?", SELECT_PRODUCT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let rows = match filter.category_id {
            Some(category_id) => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{} WHERE category_id = ? ORDER BY id LIMIT ? OFFSET ?",
                    SELECT_PRODUCT
                ))
                .bind(category_id)
                .bind(filter.limit)
                .bind(filter.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "{} ORDER BY id LIMIT ? OFFSET ?",
                    SELECT_PRODUCT
                ))
                .bind(filter.limit)
                .bind(filter.offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_category(&self, category_id: i64) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{} WHERE category_id = ? ORDER BY id",
            SELECT_PRODUCT
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let row = ProductRow::try_from(product)?;

        sqlx::query(
            r#"
            UPDATE products
            SET category_id = ?, product_name = ?, product_code = ?,
                product_barcode_symbology = ?, product_quantity = ?, product_cost = ?,
                product_price = ?, product_unit = ?, product_stock_alert = ?,
                product_order_tax = ?, product_tax_type = ?, product_note = ?
            WHERE id = ?
            "#,
        )
        .bind(row.category_id)
        .bind(&row.product_name)
        .bind(&row.product_code)
        .bind(&row.product_barcode_symbology)
        .bind(row.product_quantity)
        .bind(row.product_cost)
        .bind(row.product_price)
        .bind(&row.product_unit)
        .bind(row.product_stock_alert)
        .bind(row.product_order_tax)
        .bind(row.product_tax_type)
        .bind(&row.product_note)
        .bind(row.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_write(
                e,
                || Self::duplicate_code(&row.product_code),
                || Self::unknown_category(row.category_id),
            )
        })?;

        self.find_by_id(row.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", row.id)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {}", id)));
        }

        Ok(())
    }
}
