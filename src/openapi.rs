//! OpenAPI document for the product endpoints.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::product;
use crate::model::{ProductCreate, ProductUpdate};
use crate::response::{ProductPage, ProductResponse};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        product::list_products,
        product::get_product,
        product::create_product,
        product::update_product,
    ),
    components(schemas(
        ProductCreate,
        ProductUpdate,
        ProductResponse,
        ProductPage,
        ErrorBody,
        ErrorDetail,
    )),
    tags((name = "products", description = "Product catalogue"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api-docs/openapi.json
pub fn api_docs_routes() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
