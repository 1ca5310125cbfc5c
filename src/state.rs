//! Shared application state for all routes.

use crate::service::ProductService;
use crate::store::DynDataStore;

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(store: DynDataStore) -> Self {
        Self {
            products: ProductService::new(store),
        }
    }
}
