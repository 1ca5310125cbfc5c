//! Router assembly.

mod common;
mod product;

pub use common::common_routes;
pub use product::product_routes;

use crate::openapi::api_docs_routes;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Full application router: common, product and API doc routes with body limit and request tracing.
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(product_routes(state))
        .merge(api_docs_routes())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
