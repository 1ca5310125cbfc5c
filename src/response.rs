//! Response shapes and status helpers. Domain rows are converted explicitly here.

use crate::model::{Page, Product};
use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
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

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            sku: p.sku,
            name: p.name,
            category: p.category,
            description: p.description,
            price: p.price,
            stock: p.stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// One page of products plus the full filtered count.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<ProductResponse>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl ProductPage {
    pub fn new(items: Vec<Product>, total: i64, page: Page) -> Self {
        ProductPage {
            items: items.into_iter().map(ProductResponse::from).collect(),
            total,
            page: page.number(),
            size: page.limit,
        }
    }
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}
