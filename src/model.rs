//! Product entity, request payloads, and list parameters.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Persisted product row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /product/add`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductCreate {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: Option<i32>,
}

/// Validated insert payload handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

/// Body of `PUT /product/{id}/update`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }

    /// Merge the provided fields into `product`. Does not touch `updated_at`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(v) = &self.sku {
            product.sku = v.clone();
        }
        if let Some(v) = &self.name {
            product.name = v.clone();
        }
        if let Some(v) = &self.category {
            product.category = v.clone();
        }
        if let Some(v) = &self.description {
            product.description = Some(v.clone());
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = self.stock {
            product.stock = v;
        }
    }
}

/// Query string of `GET /product/list`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Rows to skip (default 0).
    pub skip: Option<i64>,
    /// Page size (default 10, clamped to 100).
    pub limit: Option<i64>,
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    /// Case-insensitive substring match on category.
    pub category: Option<String>,
    /// Exact match on sku.
    pub sku: Option<String>,
}

impl ListParams {
    /// Split into a checked page window and a normalized filter.
    pub fn resolve(self) -> Result<(Page, ProductFilter), AppError> {
        let page = Page::new(self.skip, self.limit)?;
        let filter = ProductFilter {
            name: non_empty(self.name),
            category: non_empty(self.category),
            sku: non_empty(self.sku),
        };
        Ok((page, filter))
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, AppError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if skip < 0 {
            return Err(AppError::Validation("skip must be greater than or equal to 0".into()));
        }
        if limit <= 0 {
            return Err(AppError::Validation("limit must be greater than 0".into()));
        }
        Ok(Page {
            skip,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// 1-based page number of `skip` for this page size.
    pub fn number(&self) -> i64 {
        self.skip / self.limit + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        contains_ci(&product.name, self.name.as_deref())
            && contains_ci(&product.category, self.category.as_deref())
            && self.sku.as_deref().map_or(true, |sku| product.sku == sku)
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}
