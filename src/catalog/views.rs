use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::{category, product, product_image, product_translation};
use crate::repository::{CategoryRow, ProductRow};

pub const NO_IMAGE: &str = "no-image.jpg";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: i32,
    pub price: Decimal,
    pub original_price: Decimal,
    pub stock: i32,
    pub view_count: i32,
    pub date_created: DateTime<Utc>,
    pub language_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub seo_description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_alias: Option<String>,
    pub categories: Vec<String>,
    pub thumbnail_image: Option<String>,
}

impl ProductView {
    /// Detail view. Every translated field is `None` when the translation is missing.
    pub fn new(
        product: product::Model,
        translation: Option<product_translation::Model>,
        categories: Vec<String>,
        default_image: Option<product_image::Model>,
    ) -> ProductView {
        let thumbnail_image = default_image
            .map(|image| image.image_path)
            .unwrap_or_else(|| NO_IMAGE.to_owned());

        let mut view = ProductView {
            id: product.id,
            price: product.price,
            original_price: product.original_price,
            stock: product.stock,
            view_count: product.view_count,
            date_created: product.date_created,
            language_id: None,
            name: None,
            description: None,
            details: None,
            seo_description: None,
            seo_title: None,
            seo_alias: None,
            categories,
            thumbnail_image: Some(thumbnail_image),
        };

        if let Some(translation) = translation {
            view.language_id = Some(translation.language_id);
            view.name = Some(translation.name);
            view.description = Some(translation.description);
            view.details = translation.details;
            view.seo_description = translation.seo_description;
            view.seo_title = translation.seo_title;
            view.seo_alias = translation.seo_alias;
        }

        view
    }
}

impl From<ProductRow> for ProductView {
    fn from(row: ProductRow) -> Self {
        ProductView {
            id: row.id,
            price: row.price,
            original_price: row.original_price,
            stock: row.stock,
            view_count: row.view_count,
            date_created: row.date_created,
            language_id: Some(row.language_id),
            name: Some(row.name),
            description: Some(row.description),
            details: row.details,
            seo_description: row.seo_description,
            seo_title: row.seo_title,
            seo_alias: row.seo_alias,
            categories: Vec::new(),
            thumbnail_image: row.thumbnail_image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductImageView {
    pub id: i32,
    pub product_id: i32,
    pub image_path: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub is_default: bool,
    pub date_created: DateTime<Utc>,
    pub sort_order: i32,
    pub file_size: i64,
}

impl ProductImageView {
    pub fn new(image: product_image::Model, image_url: String) -> ProductImageView {
        ProductImageView {
            id: image.id,
            product_id: image.product_id,
            image_path: image.image_path,
            image_url,
            caption: image.caption,
            is_default: image.is_default,
            date_created: image.date_created,
            sort_order: image.sort_order,
            file_size: image.file_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
    pub is_show_on_home: bool,
    pub parent_id: Option<i32>,
    pub status: category::Status,
}

impl From<CategoryRow> for CategoryView {
    fn from(row: CategoryRow) -> Self {
        CategoryView {
            id: row.id,
            name: row.name,
            sort_order: row.sort_order,
            is_show_on_home: row.is_show_on_home,
            parent_id: row.parent_id,
            status: row.status,
        }
    }
}
