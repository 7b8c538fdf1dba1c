use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::error::CatalogError;
use crate::middleware::logging::to_response;

pub fn category_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/category", get(get_categories))
        .layer(Extension(state))
}

async fn get_categories(
    Query(params): Query<GetCategoriesQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Response, CatalogError> {
    let categories = state.categories.get_all(&params.language_id).await?;
    Ok(to_response((StatusCode::OK, Json(categories)), Ok(())))
}

#[derive(Deserialize)]
pub struct GetCategoriesQuery {
    pub language_id: String,
}
