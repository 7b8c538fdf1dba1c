use std::path::Path;

use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::CatalogError;

pub static LANGUAGE_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("language id regex"));

/// Rejects language ids that are not `xx` or `xx-YY`.
pub fn check_language(language_id: &str) -> Result<(), CatalogError> {
    if LANGUAGE_ID_REGEX.is_match(language_id) {
        Ok(())
    } else {
        Err(CatalogError::Validation(format!(
            "Invalid language id: {language_id}"
        )))
    }
}

fn default_page_index() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

/// A file received from a client, held in memory until it is stored.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        FileUpload {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> i64 {
        self.data.len() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extension of the client-side file name, lowercased, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetManageProductPagingRequest {
    #[serde(default = "default_page_index")]
    #[validate(range(min = 1))]
    pub page_index: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u64,
    pub keyword: Option<String>,
    pub category_id: Option<i32>,
    #[validate(regex(path = *LANGUAGE_ID_REGEX))]
    pub language_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetPublicProductPagingRequest {
    #[serde(default = "default_page_index")]
    #[validate(range(min = 1))]
    pub page_index: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u64,
    pub category_id: Option<i32>,
}

#[derive(Debug, Clone, Validate)]
pub struct ProductCreateRequest {
    pub price: Decimal,
    pub original_price: Decimal,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    pub details: Option<String>,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
    #[validate(regex(path = *LANGUAGE_ID_REGEX))]
    pub language_id: String,
    pub thumbnail_image: Option<FileUpload>,
}

#[derive(Debug, Clone, Validate)]
pub struct ProductUpdateRequest {
    pub id: i32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    pub details: Option<String>,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
    #[validate(regex(path = *LANGUAGE_ID_REGEX))]
    pub language_id: String,
    pub thumbnail_image: Option<FileUpload>,
}

#[derive(Debug, Clone, Validate)]
pub struct ProductImageCreateRequest {
    #[validate(length(max = 200))]
    pub caption: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    pub image_file: FileUpload,
}

#[derive(Debug, Clone, Validate)]
pub struct ProductImageUpdateRequest {
    #[validate(length(max = 200))]
    pub caption: Option<String>,
    pub is_default: bool,
    pub sort_order: i32,
    pub image_file: Option<FileUpload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectItem {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryAssignRequest {
    pub categories: Vec<SelectItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryCreateRequest {
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_show_on_home: bool,
    pub parent_id: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
    #[validate(regex(path = *LANGUAGE_ID_REGEX))]
    pub language_id: String,
}
