//! Request validation for product payloads.

use crate::error::AppError;
use crate::model::{NewProduct, ProductCreate, ProductUpdate};
use regex::Regex;
use std::sync::LazyLock;

const SKU_MAX: usize = 64;
const NAME_MAX: usize = 255;
const CATEGORY_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 2000;

static SKU_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("static sku pattern"));

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. Returns the trimmed insert payload.
    pub fn validate_create(body: ProductCreate) -> Result<NewProduct, AppError> {
        let stock = body.stock.unwrap_or(0);
        validate_price(body.price)?;
        validate_stock(stock)?;
        Ok(NewProduct {
            sku: validate_sku(&body.sku)?,
            name: validate_text("name", &body.name, NAME_MAX)?,
            category: validate_text("category", &body.category, CATEGORY_MAX)?,
            description: body
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            price: body.price,
            stock,
        })
    }

    /// Validate only the fields present in an update body. Returns the trimmed changes.
    pub fn validate_update(body: ProductUpdate) -> Result<ProductUpdate, AppError> {
        if let Some(price) = body.price {
            validate_price(price)?;
        }
        if let Some(stock) = body.stock {
            validate_stock(stock)?;
        }
        Ok(ProductUpdate {
            sku: body.sku.as_deref().map(validate_sku).transpose()?,
            name: body
                .name
                .as_deref()
                .map(|v| validate_text("name", v, NAME_MAX))
                .transpose()?,
            category: body
                .category
                .as_deref()
                .map(|v| validate_text("category", v, CATEGORY_MAX))
                .transpose()?,
            description: body
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            price: body.price,
            stock: body.stock,
        })
    }
}

fn validate_sku(v: &str) -> Result<String, AppError> {
    let sku = validate_text("sku", v, SKU_MAX)?;
    if !SKU_PATTERN.is_match(&sku) {
        return Err(AppError::Validation(
            "sku may contain only letters, digits, '.', '_' and '-', starting with a letter or digit".into(),
        ));
    }
    Ok(sku)
}

fn validate_text(field: &str, v: &str, max: usize) -> Result<String, AppError> {
    let s = v.trim();
    if s.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if s.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(s.to_string())
}

fn validate_description(v: &str) -> Result<String, AppError> {
    let s = v.trim();
    if s.chars().count() > DESCRIPTION_MAX {
        return Err(AppError::Validation(format!(
            "description must be at most {} characters",
            DESCRIPTION_MAX
        )));
    }
    Ok(s.to_string())
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation("price must be a non-negative number".into()));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::Validation("stock must be at least 0".into()));
    }
    Ok(())
}
