pub mod category;
pub mod product;
pub mod uploads;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;
use category::category_router;
use product::product_router;

pub fn public_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(category_router(state.clone()))
        .merge(product_router(state))
}
