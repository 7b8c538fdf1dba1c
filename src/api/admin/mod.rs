pub mod category;
pub mod image;
pub mod product;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;
use category::admin_category_router;
use image::admin_image_router;
use product::admin_product_router;

pub fn admin_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(admin_category_router(state.clone()))
        .merge(admin_product_router(state.clone()))
        .merge(admin_image_router(state))
}
