//! Product API: list, read, create and update products with unique SKUs.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Settings, StoreKind};
pub use error::AppError;
pub use migration::{ensure_database_exists, ensure_products_table};
pub use model::{ListParams, Product, ProductCreate, ProductUpdate};
pub use routes::{build_router, common_routes, product_routes};
pub use service::ProductService;
pub use state::AppState;
pub use store::{DataStore, DynDataStore, MemoryStore, PgStore};
