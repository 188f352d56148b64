use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::core::traits::HealthProbe;
use crate::core::{AppError, Result};
use crate::middleware::auth::{ApiKeyRecord, ApiKeyRepository};
use crate::modules::categories::models::{Category, CategorySummary, NewCategory};
use crate::modules::categories::repositories::CategoryRepository;
use crate::modules::products::models::{NewProduct, Product, ProductRow};
use crate::modules::products::repositories::{ProductFilter, ProductRepository};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, ProductRow>,
    api_keys: HashMap<String, ApiKeyRecord>,
    last_category_id: i64,
    last_product_id: i64,
}

// Codes compare case-insensitively, matching the `utf8mb4_unicode_ci` unique indexes.
fn same_code(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Tables {
    fn category_code_taken(&self, code: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| same_code(&c.category_code, code) && Some(c.id) != except)
    }

    fn product_code_taken(&self, code: &str, except: Option<i64>) -> bool {
        self.products
            .values()
            .any(|p| same_code(&p.product_code, code) && Some(p.id) != except)
    }
}

/// In-memory relational store for categories, products and API keys.
///
/// Intended for tests/dev. Every write runs in one critical section, so the unique
/// and foreign-key checks behave like the MySQL constraints: of two racing writers
/// with the same code exactly one wins. Products hold cents exactly as the `products`
/// table does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create(&self, category: &NewCategory) -> Result<Category> {
        let mut tables = self.write()?;

        if tables.category_code_taken(&category.category_code, None) {
            return Err(AppError::duplicate_key(format!(
                "Category with category_code '{}' already exists",
                category.category_code
            )));
        }

        tables.last_category_id += 1;
        let now = Utc::now();
        let created = Category {
            id: tables.last_category_id,
            category_code: category.category_code.clone(),
            category_name: category.category_name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<CategorySummary>> {
        let tables = self.read()?;

        Ok(tables
            .categories
            .values()
            .map(|category| CategorySummary {
                products_count: tables
                    .products
                    .values()
                    .filter(|p| p.category_id == category.id)
                    .count() as i64,
                category: category.clone(),
            })
            .collect())
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        let mut tables = self.write()?;

        if !tables.categories.contains_key(&category.id) {
            return Err(AppError::not_found(format!("Category {}", category.id)));
        }
        if tables.category_code_taken(&category.category_code, Some(category.id)) {
            return Err(AppError::duplicate_key(format!(
                "Category with category_code '{}' already exists",
                category.category_code
            )));
        }

        let stored = tables
            .categories
            .get_mut(&category.id)
            .ok_or_else(|| AppError::not_found(format!("Category {}", category.id)))?;
        stored.category_code = category.category_code.clone();
        stored.category_name = category.category_name.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tables = self.write()?;

        if !tables.categories.contains_key(&id) {
            return Err(AppError::not_found(format!("Category {}", id)));
        }
        if tables.products.values().any(|p| p.category_id == id) {
            return Err(AppError::conflict(format!(
                "Category {} still has products and cannot be deleted",
                id
            )));
        }

        tables.categories.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, product: &NewProduct) -> Result<Product> {
        let (cost, price) = product.stored_amounts()?;
        let mut tables = self.write()?;

        if tables.product_code_taken(&product.product_code, None) {
            return Err(AppError::duplicate_key(format!(
                "Product with product_code '{}' already exists",
                product.product_code
            )));
        }
        if !tables.categories.contains_key(&product.category_id) {
            return Err(AppError::validation(format!(
                "category_id {} does not reference an existing category",
                product.category_id
            )));
        }

        tables.last_product_id += 1;
        let now = Utc::now();
        let row = ProductRow {
            id: tables.last_product_id,
            category_id: product.category_id,
            product_name: product.product_name.clone(),
            product_code: product.product_code.clone(),
            product_barcode_symbology: product.product_barcode_symbology.clone(),
            product_quantity: product.product_quantity,
            product_cost: cost,
            product_price: price,
            product_unit: product.product_unit.clone(),
            product_stock_alert: product.product_stock_alert,
            product_order_tax: product.product_order_tax,
            product_tax_type: product.product_tax_type,
            product_note: product.product_note.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(row.id, row.clone());

        Ok(Product::from(row))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned().map(Product::from))
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let tables = self.read()?;

        Ok(tables
            .products
            .values()
            .filter(|p| filter.category_id.map_or(true, |id| p.category_id == id))
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .map(Product::from)
            .collect())
    }

    async fn find_by_category(&self, category_id: i64) -> Result<Vec<Product>> {
        let tables = self.read()?;

        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .map(Product::from)
            .collect())
    }

    async fn update(&self, product: &Product) -> Result<Product> {
        let mut row = ProductRow::try_from(product)?;
        let mut tables = self.write()?;

        let existing = tables
            .products
            .get(&row.id)
            .ok_or_else(|| AppError::not_found(format!("Product {}", row.id)))?;
        row.created_at = existing.created_at;

        if tables.product_code_taken(&row.product_code, Some(row.id)) {
            return Err(AppError::duplicate_key(format!(
                "Product with product_code '{}' already exists",
                row.product_code
            )));
        }
        if !tables.categories.contains_key(&row.category_id) {
            return Err(AppError::validation(format!(
                "category_id {} does not reference an existing category",
                row.category_id
            )));
        }

        row.updated_at = Utc::now();
        tables.products.insert(row.id, row.clone());

        Ok(Product::from(row))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.write()?
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Product {}", id)))
    }
}

#[async_trait]
impl ApiKeyRepository for MemoryStore {
    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>> {
        Ok(self
            .read()?
            .api_keys
            .get(key_hash)
            .filter(|record| record.is_active)
            .cloned())
    }

    async fn insert(&self, record: &ApiKeyRecord) -> Result<()> {
        let mut tables = self.write()?;

        if tables.api_keys.contains_key(&record.key_hash) {
            return Err(AppError::duplicate_key("API key already exists"));
        }
        tables
            .api_keys
            .insert(record.key_hash.clone(), record.clone());

        Ok(())
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }
}
