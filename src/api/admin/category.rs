use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::AppState;
use crate::catalog::requests::CategoryCreateRequest;
use crate::error::CatalogError;
use crate::middleware::logging::to_response;

//ROUTERS
pub fn admin_category_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/category", post(create_category))
        .layer(Extension(state))
}

//ROUTES
async fn create_category(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CategoryCreateRequest>,
) -> Result<Response, CatalogError> {
    let id = state.categories.create(payload).await?;
    Ok(to_response(
        (StatusCode::CREATED, Json(json!({ "id": id }))),
        Ok(()),
    ))
}
