//! Storage-facing capabilities the catalog services depend on.
//!
//! Services only see these traits; [`DbRepository`] implements them on top of
//! sea-orm. Multi-row writes run inside one database transaction.

mod database;

pub use database::DbRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;

use crate::entities::{category, product, product_image, product_translation};
use crate::error::CatalogError;

/// Identity of a product translation row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    pub product_id: i32,
    pub language_id: String,
}

impl TranslationKey {
    pub fn new(product_id: i32, language_id: impl Into<String>) -> Self {
        TranslationKey {
            product_id,
            language_id: language_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub language_id: String,
    /// Literal substring of the translated name.
    pub keyword: Option<String>,
    /// `Some(0)` is treated like `None`.
    pub category_id: Option<i32>,
}

/// One product joined with its translation and default image.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ProductRow {
    pub id: i32,
    pub price: Decimal,
    pub original_price: Decimal,
    pub stock: i32,
    pub view_count: i32,
    pub date_created: DateTime<Utc>,
    pub language_id: String,
    pub name: String,
    pub description: String,
    pub details: Option<String>,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
    pub thumbnail_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct CategoryRow {
    pub id: i32,
    pub sort_order: i32,
    pub is_show_on_home: bool,
    pub parent_id: Option<i32>,
    pub status: category::Status,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TranslationFields {
    pub name: String,
    pub description: String,
    pub details: Option<String>,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
}

/// A file already written to storage, ready to be referenced by an image row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub image_path: String,
    pub file_size: i64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub price: Decimal,
    pub original_price: Decimal,
    pub stock: i32,
    pub language_id: String,
    pub translation: TranslationFields,
    pub thumbnail: Option<StoredFile>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub product_id: i32,
    pub caption: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    pub file: StoredFile,
}

#[derive(Debug, Clone)]
pub struct ImageChanges {
    pub caption: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    pub file: Option<StoredFile>,
}

#[derive(Debug, Clone)]
pub struct CategorySelection {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    Applied,
    /// Nothing was written because this category name does not resolve.
    UnknownCategory(String),
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub sort_order: i32,
    pub is_show_on_home: bool,
    pub parent_id: Option<i32>,
    pub language_id: String,
    pub name: String,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_product(&self, product_id: i32) -> Result<Option<product::Model>, CatalogError>;

    async fn find_translation(
        &self,
        key: &TranslationKey,
    ) -> Result<Option<product_translation::Model>, CatalogError>;

    /// Names, in the key's language, of the categories the product belongs to.
    async fn find_category_names(&self, key: &TranslationKey) -> Result<Vec<String>, CatalogError>;

    async fn find_default_image(
        &self,
        product_id: i32,
    ) -> Result<Option<product_image::Model>, CatalogError>;

    /// Returns one page (1-based `page_index`) and the total number of matching rows.
    /// Pages past the end, however far, are empty.
    async fn find_page(
        &self,
        filter: &ProductFilter,
        page_index: u64,
        page_size: u64,
    ) -> Result<(Vec<ProductRow>, u64), CatalogError>;

    async fn insert_product(&self, product: NewProduct) -> Result<i32, CatalogError>;

    /// Overwrites the translation and, when given, repoints the default image.
    /// Returns the path of the file that is no longer referenced.
    async fn update_product(
        &self,
        key: &TranslationKey,
        fields: TranslationFields,
        thumbnail: Option<StoredFile>,
    ) -> Result<Option<String>, CatalogError>;

    async fn set_price(&self, product_id: i32, price: Decimal) -> Result<bool, CatalogError>;

    /// Fails with a validation error when the result would leave the `i32` range.
    async fn add_stock(&self, product_id: i32, delta: i32) -> Result<bool, CatalogError>;

    async fn add_view_count(&self, product_id: i32) -> Result<bool, CatalogError>;

    async fn assign_categories(
        &self,
        product_id: i32,
        selections: &[CategorySelection],
    ) -> Result<AssignOutcome, CatalogError>;

    /// Removes the product and its dependent rows. Returns the paths of the
    /// image files no longer referenced, or `None` when the product does not exist.
    async fn delete_product(&self, product_id: i32) -> Result<Option<Vec<String>>, CatalogError>;

    async fn insert_image(&self, image: NewImage) -> Result<product_image::Model, CatalogError>;

    async fn find_image(&self, image_id: i32) -> Result<Option<product_image::Model>, CatalogError>;

    async fn find_images(&self, product_id: i32) -> Result<Vec<product_image::Model>, CatalogError>;

    async fn update_image(
        &self,
        image_id: i32,
        changes: ImageChanges,
    ) -> Result<Option<String>, CatalogError>;

    /// Returns the path of the removed image's file, or `None` when it does not exist.
    async fn delete_image(&self, image_id: i32) -> Result<Option<String>, CatalogError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert_category(&self, category: NewCategory) -> Result<i32, CatalogError>;

    async fn find_categories(&self, language_id: &str) -> Result<Vec<CategoryRow>, CatalogError>;
}
