use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::{multipart::MultipartForm, AppState};
use crate::catalog::requests::{ProductImageCreateRequest, ProductImageUpdateRequest};
use crate::error::CatalogError;
use crate::middleware::logging::to_response;

//ROUTERS
pub fn admin_image_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/product/:id/images", get(get_images).post(add_image))
        .route(
            "/product/:id/images/:image_id",
            get(get_image).put(update_image).delete(remove_image),
        )
        .layer(Extension(state))
}

//ROUTES
async fn get_images(
    Path(id): Path<i32>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let images = state.manage_products.get_list_images(id).await?;
    Ok(to_response((StatusCode::OK, Json(images)), Ok(())))
}

async fn get_image(
    Path((id, image_id)): Path<(i32, i32)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let image = state.manage_products.get_image_by_id(image_id).await?;
    if image.product_id != id {
        return Err(CatalogError::image_not_found(image_id));
    }
    Ok(to_response((StatusCode::OK, Json(image)), Ok(())))
}

async fn add_image(
    Path(id): Path<i32>,
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let mut form = MultipartForm::read(multipart, state.file_size_limit).await?;

    let Some(image_file) = form.take_file("image_file") else {
        return Err(CatalogError::Validation("Field image_file is required".to_owned()));
    };
    let request = ProductImageCreateRequest {
        caption: form.text("caption"),
        is_default: form.parse_or("is_default", false)?,
        sort_order: form.parse_or("sort_order", 0)?,
        image_file,
    };

    let image_id = state.manage_products.add_image(id, request).await?;
    Ok(to_response(
        (StatusCode::CREATED, Json(json!({ "id": image_id }))),
        Ok(()),
    ))
}

async fn update_image(
    Path((id, image_id)): Path<(i32, i32)>,
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let mut form = MultipartForm::read(multipart, state.file_size_limit).await?;

    let current = state.manage_products.get_image_by_id(image_id).await?;
    if current.product_id != id {
        return Err(CatalogError::image_not_found(image_id));
    }

    let request = ProductImageUpdateRequest {
        caption: form.text("caption").or(current.caption),
        is_default: form.parse_or("is_default", current.is_default)?,
        sort_order: form.parse_or("sort_order", current.sort_order)?,
        image_file: form.take_file("image_file"),
    };

    state.manage_products.update_image(image_id, request).await?;
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

async fn remove_image(
    Path((id, image_id)): Path<(i32, i32)>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let current = state.manage_products.get_image_by_id(image_id).await?;
    if current.product_id != id {
        return Err(CatalogError::image_not_found(image_id));
    }

    state.manage_products.remove_image(image_id).await?;
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
