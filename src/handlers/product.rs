//! Product handlers: list, info, add, update.

use crate::error::{AppError, ErrorBody};
use crate::model::{ListParams, ProductCreate, ProductUpdate};
use crate::response::{self, ProductPage, ProductResponse};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/product/list",
    tag = "products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 422, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query?;
    let page = state.products.list(params).await?;
    Ok(response::ok(page))
}

#[utoipa::path(
    get,
    path = "/product/{id}/info",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorBody)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let product = state.products.get(id).await?;
    Ok(response::ok(ProductResponse::from(product)))
}

#[utoipa::path(
    post,
    path = "/product/add",
    tag = "products",
    request_body = ProductCreate,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "A product with this SKU already exists", body = ErrorBody),
        (status = 422, description = "Invalid product", body = ErrorBody)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductCreate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let product = state.products.create(body).await?;
    Ok(response::created(ProductResponse::from(product)))
}

#[utoipa::path(
    put,
    path = "/product/{id}/update",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "A product with this SKU already exists", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 422, description = "Invalid product", body = ErrorBody)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let product = state.products.update(id, body).await?;
    Ok(response::ok(ProductResponse::from(product)))
}
