#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

use eshop_catalog::api::AppState;
use eshop_catalog::catalog::requests::{CategoryCreateRequest, FileUpload, ProductCreateRequest};
use eshop_catalog::entities::setup_schema;
use eshop_catalog::storage::FileStorageService;

pub const FILE_SIZE_LIMIT: usize = 1024 * 1024;

/// A fresh in-memory catalog with its own upload folder.
pub struct TestCatalog {
    pub db: Arc<DatabaseConnection>,
    pub state: Arc<AppState>,
    pub storage: FileStorageService,
    // Dropping the directory removes every stored file.
    _content_root: TempDir,
}

impl TestCatalog {
    pub async fn new() -> TestCatalog {
        // A single connection keeps every query on the same in-memory database.
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        setup_schema(&db).await.expect("Failed to create schema");
        let db = Arc::new(db);

        let content_root = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorageService::new(content_root.path());
        let state = Arc::new(AppState::new(db.clone(), storage.clone(), FILE_SIZE_LIMIT));

        TestCatalog {
            db,
            state,
            storage,
            _content_root: content_root,
        }
    }

    /// Names of the files currently in the upload folder, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.storage.folder()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub async fn create_product(&self, name: &str, language_id: &str) -> i32 {
        self.state
            .manage_products
            .create(product_request(name, language_id, None))
            .await
            .expect("Failed to create product")
    }

    pub async fn create_category(&self, name: &str, language_id: &str) -> i32 {
        self.state
            .categories
            .create(CategoryCreateRequest {
                sort_order: 1,
                is_show_on_home: true,
                parent_id: None,
                name: name.to_owned(),
                seo_description: None,
                seo_title: None,
                seo_alias: None,
                language_id: language_id.to_owned(),
            })
            .await
            .expect("Failed to create category")
    }
}

pub fn product_request(
    name: &str,
    language_id: &str,
    thumbnail_image: Option<FileUpload>,
) -> ProductCreateRequest {
    ProductCreateRequest {
        price: price("100.5"),
        original_price: price("80.5"),
        stock: 10,
        name: name.to_owned(),
        description: format!("{name} description"),
        details: Some(format!("{name} details")),
        seo_description: None,
        seo_title: None,
        seo_alias: None,
        language_id: language_id.to_owned(),
        thumbnail_image,
    }
}

pub fn image(file_name: &str) -> FileUpload {
    FileUpload::new(file_name, b"\x89PNG fake image bytes".to_vec())
}

pub fn price(value: &str) -> Decimal {
    value.parse().expect("Invalid decimal literal")
}
