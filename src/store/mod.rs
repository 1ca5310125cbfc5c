//! `DataStore`: persistence capability consumed by `ProductService`.
//!
//! Implementations own their connection resources and enforce `sku` uniqueness
//! themselves; a duplicate write surfaces as `AppError::Conflict`.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{NewProduct, Page, Product, ProductFilter, ProductUpdate};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait DataStore: Send + Sync {
    /// One page of matching products ordered by id, plus the count of all matches.
    async fn list(&self, filter: &ProductFilter, page: Page) -> Result<(Vec<Product>, i64), AppError>;

    async fn get(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError>;

    async fn insert(&self, product: &NewProduct) -> Result<Product, AppError>;

    /// Apply `changes` to the row with `id`. `None` when the row does not exist.
    async fn update(&self, id: i64, changes: &ProductUpdate) -> Result<Option<Product>, AppError>;

    /// Cheap liveness probe used by `/ready`.
    async fn ping(&self) -> Result<(), AppError>;
}

pub type DynDataStore = Arc<dyn DataStore>;
