use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eshop_catalog::api::{create_api_router, AppState};
use eshop_catalog::config::AppConfig;
use eshop_catalog::entities::{seed_identity, setup_schema};
use eshop_catalog::storage::FileStorageService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let db: DatabaseConnection = Database::connect(&config.database_url).await?;
    setup_schema(&db).await?;

    match config.admin_password.as_deref() {
        Some(password) => seed_identity(&db, password).await?,
        None => info!("ADMIN_PASSWORD is not set, skipping admin seeding"),
    }

    let storage = FileStorageService::new(&config.content_root);
    tokio::fs::create_dir_all(storage.folder()).await?;

    let state = Arc::new(AppState::new(
        Arc::new(db),
        storage,
        config.file_size_limit,
    ));
    let app = create_api_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Running");
    axum::serve(listener, app).await?;

    Ok(())
}
