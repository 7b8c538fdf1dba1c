pub mod admin;
pub mod multipart;
pub mod public;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::catalog::{CategoryService, ManageProductService, PublicProductService};
use crate::middleware::logging::logging_middleware;
use crate::repository::DbRepository;
use crate::storage::FileStorageService;

use admin::admin_api_router;
use public::{public_api_router, uploads::uploads_router};

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppState {
    pub manage_products: ManageProductService,
    pub public_products: PublicProductService,
    pub categories: CategoryService,
    pub storage: Arc<FileStorageService>,
    pub file_size_limit: usize,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        storage: FileStorageService,
        file_size_limit: usize,
    ) -> AppState {
        let repository = Arc::new(DbRepository::new(db));
        let storage = Arc::new(storage);

        AppState {
            manage_products: ManageProductService::new(repository.clone(), storage.clone()),
            public_products: PublicProductService::new(repository.clone()),
            categories: CategoryService::new(repository),
            storage,
            file_size_limit,
        }
    }
}

pub fn create_api_router(state: Arc<AppState>) -> Router {
    // Leave room for the text fields so oversized files reach the 413 check.
    let body_limit = state.file_size_limit.saturating_mul(2);

    Router::new()
        .nest("/api", public_api_router(state.clone()))
        .nest("/api/admin", admin_api_router(state.clone()))
        .merge(uploads_router(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
