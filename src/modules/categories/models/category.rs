// Category model
//
// A category is a named grouping of products. `category_code` is the natural key and
// is unique across all categories; the storage layer enforces it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

const MAX_FIELD_LENGTH: usize = 255;

/// Persisted category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub category_code: String,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row in listings, with the number of products referencing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategorySummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub category: Category,
    pub products_count: i64,
}

/// Validated input for a new category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub category_code: String,
    pub category_name: String,
}

impl NewCategory {
    pub fn new(category_code: impl Into<String>, category_name: impl Into<String>) -> Result<Self> {
        let category_code = category_code.into().trim().to_string();
        let category_name = category_name.into().trim().to_string();

        validate_text("category_code", &category_code)?;
        validate_text("category_name", &category_name)?;

        Ok(Self {
            category_code,
            category_name,
        })
    }
}

/// Request body for POST /categories.
///
/// Only the listed fields are assignable; anything else is rejected.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub category_code: String,
    pub category_name: String,
}

/// Request body for PUT /categories/{id}; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    pub category_code: Option<String>,
    pub category_name: Option<String>,
}

impl TryFrom<CreateCategoryRequest> for NewCategory {
    type Error = AppError;

    fn try_from(request: CreateCategoryRequest) -> Result<Self> {
        NewCategory::new(request.category_code, request.category_name)
    }
}

impl Category {
    /// Merge a partial update into this category and re-validate the touched fields
    pub fn apply(&mut self, changes: UpdateCategoryRequest) -> Result<()> {
        if let Some(code) = changes.category_code {
            let code = code.trim().to_string();
            validate_text("category_code", &code)?;
            self.category_code = code;
        }

        if let Some(name) = changes.category_name {
            let name = name.trim().to_string();
            validate_text("category_name", &name)?;
            self.category_name = name;
        }

        Ok(())
    }
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(AppError::validation(format!(
            "{} must not exceed {} characters",
            field, MAX_FIELD_LENGTH
        )));
    }
    Ok(())
}
