// Product model
//
// A product belongs to exactly one category. Cost and price are decimals in major
// units everywhere above the repository; `ProductRow` is the persisted shape and
// carries them as integer cents. The two only meet through `core::money`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::money;
use crate::core::{AppError, Result};

const MAX_TEXT_LENGTH: usize = 255;
const MAX_NOTE_LENGTH: usize = 1000;
const MAX_ORDER_TAX: i32 = 100;
const TAX_TYPE_CODES: std::ops::RangeInclusive<i16> = 0..=2;

/// Barcode symbology used when the caller does not pick one
pub const DEFAULT_BARCODE_SYMBOLOGY: &str = "Code128";

/// Product as seen by services and API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub product_name: String,
    pub product_code: String,
    pub product_barcode_symbology: String,
    pub product_quantity: i32,
    /// Cost in major units (e.g. 10.50)
    pub product_cost: Decimal,
    /// Price in major units (e.g. 25.99)
    pub product_price: Decimal,
    pub product_unit: Option<String>,
    pub product_stock_alert: i32,
    pub product_order_tax: i32,
    pub product_tax_type: i16,
    pub product_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted product row; `product_cost` and `product_price` are minor units (cents)
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub category_id: i64,
    pub product_name: String,
    pub product_code: String,
    pub product_barcode_symbology: String,
    pub product_quantity: i32,
    pub product_cost: i64,
    pub product_price: i64,
    pub product_unit: Option<String>,
    pub product_stock_alert: i32,
    pub product_order_tax: i32,
    pub product_tax_type: i16,
    pub product_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            product_name: row.product_name,
            product_code: row.product_code,
            product_barcode_symbology: row.product_barcode_symbology,
            product_quantity: row.product_quantity,
            product_cost: money::from_storage(row.product_cost),
            product_price: money::from_storage(row.product_price),
            product_unit: row.product_unit,
            product_stock_alert: row.product_stock_alert,
            product_order_tax: row.product_order_tax,
            product_tax_type: row.product_tax_type,
            product_note: row.product_note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<&Product> for ProductRow {
    type Error = AppError;

    fn try_from(product: &Product) -> Result<Self> {
        Ok(Self {
            id: product.id,
            category_id: product.category_id,
            product_name: product.product_name.clone(),
            product_code: product.product_code.clone(),
            product_barcode_symbology: product.product_barcode_symbology.clone(),
            product_quantity: product.product_quantity,
            product_cost: money::to_storage(product.product_cost)?,
            product_price: money::to_storage(product.product_price)?,
            product_unit: product.product_unit.clone(),
            product_stock_alert: product.product_stock_alert,
            product_order_tax: product.product_order_tax,
            product_tax_type: product.product_tax_type,
            product_note: product.product_note.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

/// Validated input for a new product (major units)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category_id: i64,
    pub product_name: String,
    pub product_code: String,
    pub product_barcode_symbology: String,
    pub product_quantity: i32,
    pub product_cost: Decimal,
    pub product_price: Decimal,
    pub product_unit: Option<String>,
    pub product_stock_alert: i32,
    pub product_order_tax: i32,
    pub product_tax_type: i16,
    pub product_note: Option<String>,
}

impl NewProduct {
    /// Stored cost and price in minor units, in that order
    pub fn stored_amounts(&self) -> Result<(i64, i64)> {
        Ok((
            money::to_storage(self.product_cost)?,
            money::to_storage(self.product_price)?,
        ))
    }
}

/// Request body for POST /products.
///
/// Fields not listed here (id, timestamps) cannot be assigned by callers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    pub category_id: i64,
    pub product_name: String,
    pub product_code: String,
    #[serde(default)]
    pub product_barcode_symbology: Option<String>,
    pub product_quantity: i32,
    pub product_cost: Decimal,
    pub product_price: Decimal,
    #[serde(default)]
    pub product_unit: Option<String>,
    pub product_stock_alert: i32,
    #[serde(default)]
    pub product_order_tax: Option<i32>,
    #[serde(default)]
    pub product_tax_type: Option<i16>,
    #[serde(default)]
    pub product_note: Option<String>,
}

/// Request body for PUT /products/{id}; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub category_id: Option<i64>,
    pub product_name: Option<String>,
    pub product_code: Option<String>,
    pub product_barcode_symbology: Option<String>,
    pub product_quantity: Option<i32>,
    pub product_cost: Option<Decimal>,
    pub product_price: Option<Decimal>,
    pub product_unit: Option<String>,
    pub product_stock_alert: Option<i32>,
    pub product_order_tax: Option<i32>,
    pub product_tax_type: Option<i16>,
    pub product_note: Option<String>,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = AppError;

    fn try_from(request: CreateProductRequest) -> Result<Self> {
        let product = NewProduct {
            category_id: request.category_id,
            product_name: request.product_name.trim().to_string(),
            product_code: request.product_code.trim().to_string(),
            product_barcode_symbology: request
                .product_barcode_symbology
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_BARCODE_SYMBOLOGY.to_string()),
            product_quantity: request.product_quantity,
            product_cost: request.product_cost,
            product_price: request.product_price,
            product_unit: normalize_optional(request.product_unit),
            product_stock_alert: request.product_stock_alert,
            product_order_tax: request.product_order_tax.unwrap_or(0),
            product_tax_type: request.product_tax_type.unwrap_or(0),
            product_note: normalize_optional(request.product_note),
        };

        validate_category_id(product.category_id)?;
        validate_text("product_name", &product.product_name)?;
        validate_text("product_code", &product.product_code)?;
        validate_text(
            "product_barcode_symbology",
            &product.product_barcode_symbology,
        )?;
        validate_non_negative("product_quantity", product.product_quantity)?;
        validate_amount("product_cost", product.product_cost)?;
        validate_amount("product_price", product.product_price)?;
        validate_optional_text("product_unit", product.product_unit.as_deref(), MAX_TEXT_LENGTH)?;
        validate_non_negative("product_stock_alert", product.product_stock_alert)?;
        validate_order_tax(product.product_order_tax)?;
        validate_tax_type(product.product_tax_type)?;
        validate_optional_text("product_note", product.product_note.as_deref(), MAX_NOTE_LENGTH)?;

        Ok(product)
    }
}

impl Product {
    /// Merge a partial update into this product.
    ///
    /// Only provided fields change; each touched field is validated, and a touched
    /// monetary field must survive the storage transform. Untouched cost/price keep
    /// their current value and therefore their stored cents.
    pub fn apply(&mut self, changes: UpdateProductRequest) -> Result<()> {
        if let Some(category_id) = changes.category_id {
            validate_category_id(category_id)?;
            self.category_id = category_id;
        }
        if let Some(name) = changes.product_name {
            let name = name.trim().to_string();
            validate_text("product_name", &name)?;
            self.product_name = name;
        }
        if let Some(code) = changes.product_code {
            let code = code.trim().to_string();
            validate_text("product_code", &code)?;
            self.product_code = code;
        }
        if let Some(symbology) = changes.product_barcode_symbology {
            let symbology = symbology.trim().to_string();
            validate_text("product_barcode_symbology", &symbology)?;
            self.product_barcode_symbology = symbology;
        }
        if let Some(quantity) = changes.product_quantity {
            validate_non_negative("product_quantity", quantity)?;
            self.product_quantity = quantity;
        }
        if let Some(cost) = changes.product_cost {
            validate_amount("product_cost", cost)?;
            self.product_cost = money::from_storage(money::to_storage(cost)?);
        }
        if let Some(price) = changes.product_price {
            validate_amount("product_price", price)?;
            self.product_price = money::from_storage(money::to_storage(price)?);
        }
        if changes.product_unit.is_some() {
            let unit = normalize_optional(changes.product_unit);
            validate_optional_text("product_unit", unit.as_deref(), MAX_TEXT_LENGTH)?;
            self.product_unit = unit;
        }
        if let Some(alert) = changes.product_stock_alert {
            validate_non_negative("product_stock_alert", alert)?;
            self.product_stock_alert = alert;
        }
        if let Some(tax) = changes.product_order_tax {
            validate_order_tax(tax)?;
            self.product_order_tax = tax;
        }
        if let Some(tax_type) = changes.product_tax_type {
            validate_tax_type(tax_type)?;
            self.product_tax_type = tax_type;
        }
        if changes.product_note.is_some() {
            let note = normalize_optional(changes.product_note);
            validate_optional_text("product_note", note.as_deref(), MAX_NOTE_LENGTH)?;
            self.product_note = note;
        }

        Ok(())
    }
}

// Validation helpers

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_category_id(category_id: i64) -> Result<()> {
    if category_id <= 0 {
        return Err(AppError::validation("category_id is required"));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    validate_optional_text(field, Some(value), MAX_TEXT_LENGTH)
}

fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::validation(format!(
            "{} must not exceed {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

fn validate_non_negative(field: &str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(AppError::validation(format!("{} cannot be negative", field)));
    }
    Ok(())
}

fn validate_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!("{} cannot be negative", field)));
    }
    money::to_storage(amount)
        .map(|_| ())
        .map_err(|_| AppError::validation(format!("{} is out of range", field)))
}

fn validate_order_tax(tax: i32) -> Result<()> {
    if !(0..=MAX_ORDER_TAX).contains(&tax) {
        return Err(AppError::validation(format!(
            "product_order_tax must be between 0 and {}",
            MAX_ORDER_TAX
        )));
    }
    Ok(())
}

fn validate_tax_type(tax_type: i16) -> Result<()> {
    if !TAX_TYPE_CODES.contains(&tax_type) {
        return Err(AppError::validation(format!(
            "product_tax_type must be one of 0, 1, 2 (got {})",
            tax_type
        )));
    }
    Ok(())
}
