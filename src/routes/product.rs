//! Product routes under `/product`.

use crate::handlers::{create_product, get_product, list_products, update_product};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/product/list", get(list_products))
        .route("/product/add", post(create_product))
        .route("/product/:id/info", get(get_product))
        .route("/product/:id/update", put(update_product))
        .with_state(state)
}
