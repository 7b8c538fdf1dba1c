use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::Response,
    routing::{get, patch, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::{multipart::MultipartForm, AppState};
use crate::catalog::requests::{
    CategoryAssignRequest, GetManageProductPagingRequest, ProductCreateRequest,
    ProductUpdateRequest,
};
use crate::error::CatalogError;
use crate::middleware::logging::{to_response, ApiError};

//ROUTERS
pub fn admin_product_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/product", get(get_products).post(create_product))
        .route(
            "/product/:id",
            get(admin_get_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/product/:id/price/:new_price", patch(update_price))
        .route("/product/:id/stock/:added_quantity", patch(update_stock))
        .route("/product/:id/categories", put(assign_categories))
        .layer(Extension(state))
}

//ROUTES
async fn get_products(
    Extension(state): Extension<Arc<AppState>>,
    Query(request): Query<GetManageProductPagingRequest>,
) -> Result<Response, CatalogError> {
    let page = state.manage_products.get_all_paging(request).await?;
    Ok(to_response((StatusCode::OK, Json(page)), Ok(())))
}

async fn admin_get_product(
    Path(id): Path<i32>,
    Query(params): Query<LanguageQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let product = state
        .manage_products
        .get_by_id(id, &params.language_id)
        .await?;
    Ok(to_response((StatusCode::OK, Json(product)), Ok(())))
}

async fn create_product(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let mut form = MultipartForm::read(multipart, state.file_size_limit).await?;

    let request = ProductCreateRequest {
        price: form.parse::<Decimal>("price")?,
        original_price: form.parse::<Decimal>("original_price")?,
        stock: form.parse_or("stock", 0)?,
        name: form.required("name")?,
        description: form.text("description").unwrap_or_default(),
        details: form.text("details"),
        seo_description: form.text("seo_description"),
        seo_title: form.text("seo_title"),
        seo_alias: form.text("seo_alias"),
        language_id: form.required("language_id")?,
        thumbnail_image: form.take_file("thumbnail_image"),
    };

    let id = state.manage_products.create(request).await?;
    Ok(to_response(
        (StatusCode::CREATED, Json(json!({ "id": id }))),
        Ok(()),
    ))
}

async fn update_product(
    Path(id): Path<i32>,
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let mut form = MultipartForm::read(multipart, state.file_size_limit).await?;

    let request = ProductUpdateRequest {
        id,
        name: form.required("name")?,
        description: form.text("description").unwrap_or_default(),
        details: form.text("details"),
        seo_description: form.text("seo_description"),
        seo_title: form.text("seo_title"),
        seo_alias: form.text("seo_alias"),
        language_id: form.required("language_id")?,
        thumbnail_image: form.take_file("thumbnail_image"),
    };

    state.manage_products.update(request).await?;
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Resource updated successfully."
            })),
        ),
        Ok(()),
    ))
}

async fn update_price(
    Path((id, new_price)): Path<(i32, Decimal)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let changed = state.manage_products.update_price(id, new_price).await?;
    Ok(to_response(
        (StatusCode::OK, Json(json!({ "changed": changed }))),
        Ok(()),
    ))
}

async fn update_stock(
    Path((id, added_quantity)): Path<(i32, i32)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let changed = state
        .manage_products
        .update_stock(id, added_quantity)
        .await?;
    Ok(to_response(
        (StatusCode::OK, Json(json!({ "changed": changed }))),
        Ok(()),
    ))
}

async fn assign_categories(
    Path(id): Path<i32>,
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CategoryAssignRequest>,
) -> Result<Response, CatalogError> {
    let result = state.manage_products.category_assign(id, payload).await?;

    if result.is_success {
        Ok(to_response((StatusCode::OK, Json(result)), Ok(())))
    } else {
        let tmp = result.message.clone().unwrap_or_default();
        Ok(to_response(
            (StatusCode::BAD_REQUEST, Json(result)),
            Err(ApiError::General(tmp)),
        ))
    }
}

async fn delete_product(
    Path(id): Path<i32>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    state.manage_products.delete(id).await?;
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Resource deleted successfully."
            })),
        ),
        Ok(()),
    ))
}

//Structs
#[derive(Deserialize)]
pub struct LanguageQuery {
    pub language_id: String,
}
