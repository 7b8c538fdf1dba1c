use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::catalog::requests::GetPublicProductPagingRequest;
use crate::error::CatalogError;
use crate::middleware::logging::to_response;

pub fn product_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/product", get(get_products))
        .route("/product/:id", get(get_product))
        .layer(Extension(state))
}

async fn get_products(
    Query(params): Query<PublicProductsQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let request = GetPublicProductPagingRequest {
        page_index: params.page_index.unwrap_or(1),
        page_size: params.page_size.unwrap_or(10),
        category_id: params.category_id,
    };
    let page = state
        .public_products
        .get_all_by_category_id(&params.language_id, request)
        .await?;
    Ok(to_response((StatusCode::OK, Json(page)), Ok(())))
}

async fn get_product(
    Path(id): Path<i32>,
    Query(params): Query<ProductQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let product = state
        .public_products
        .get_by_id(id, &params.language_id)
        .await?;
    Ok(to_response((StatusCode::OK, Json(product)), Ok(())))
}

//Structs
#[derive(Deserialize)]
pub struct PublicProductsQuery {
    pub language_id: String,
    pub page_index: Option<u64>,
    pub page_size: Option<u64>,
    pub category_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct ProductQuery {
    pub language_id: String,
}
