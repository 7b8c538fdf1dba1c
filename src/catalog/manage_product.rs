use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::catalog::paging::{ApiResult, PagedResult};
use crate::catalog::requests::{
    check_language, CategoryAssignRequest, FileUpload, GetManageProductPagingRequest,
    ProductCreateRequest, ProductImageCreateRequest, ProductImageUpdateRequest,
    ProductUpdateRequest,
};
use crate::catalog::views::{ProductImageView, ProductView};
use crate::error::CatalogError;
use crate::repository::{
    AssignOutcome, CategorySelection, ImageChanges, NewImage, NewProduct, ProductFilter,
    ProductRepository, StoredFile, TranslationFields, TranslationKey,
};
use crate::storage::StorageService;

/// Back-office operations over products, their translations, images and categories.
#[derive(Clone)]
pub struct ManageProductService {
    repository: Arc<dyn ProductRepository>,
    storage: Arc<dyn StorageService>,
}

impl ManageProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, storage: Arc<dyn StorageService>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all_paging(
        &self,
        request: GetManageProductPagingRequest,
    ) -> Result<PagedResult<ProductView>, CatalogError> {
        request.validate()?;

        let filter = ProductFilter {
            language_id: request.language_id,
            keyword: request.keyword,
            category_id: request.category_id,
        };
        let (rows, total_records) = self
            .repository
            .find_page(&filter, request.page_index, request.page_size)
            .await?;

        Ok(PagedResult::new(
            rows.into_iter().map(ProductView::from).collect(),
            total_records,
            request.page_index,
            request.page_size,
        ))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(
        &self,
        product_id: i32,
        language_id: &str,
    ) -> Result<ProductView, CatalogError> {
        check_language(language_id)?;
        let product = self
            .repository
            .find_product(product_id)
            .await?
            .ok_or_else(|| CatalogError::product_not_found(product_id))?;

        let key = TranslationKey::new(product_id, language_id);
        let translation = self.repository.find_translation(&key).await?;
        let categories = self.repository.find_category_names(&key).await?;
        let default_image = self.repository.find_default_image(product_id).await?;

        Ok(ProductView::new(product, translation, categories, default_image))
    }

    #[instrument(skip(self, request), fields(language_id = %request.language_id))]
    pub async fn create(&self, request: ProductCreateRequest) -> Result<i32, CatalogError> {
        request.validate()?;
        check_prices(request.price, request.original_price)?;

        let thumbnail = match request.thumbnail_image.as_ref() {
            Some(file) => Some(self.save_file(file).await?),
            None => None,
        };

        let new_product = NewProduct {
            price: request.price,
            original_price: request.original_price,
            stock: request.stock,
            language_id: request.language_id,
            translation: TranslationFields {
                name: request.name,
                description: request.description,
                details: request.details,
                seo_description: request.seo_description,
                seo_title: request.seo_title,
                seo_alias: request.seo_alias,
            },
            thumbnail: thumbnail.clone(),
        };

        match self.repository.insert_product(new_product).await {
            Ok(product_id) => {
                info!(product_id, "Product created");
                Ok(product_id)
            }
            Err(err) => {
                self.discard(thumbnail).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self, request), fields(product_id = request.id))]
    pub async fn update(&self, request: ProductUpdateRequest) -> Result<(), CatalogError> {
        request.validate()?;

        let key = TranslationKey::new(request.id, request.language_id);
        if self.repository.find_product(key.product_id).await?.is_none()
            || self.repository.find_translation(&key).await?.is_none()
        {
            return Err(CatalogError::product_not_found(key.product_id));
        }

        let thumbnail = match request.thumbnail_image.as_ref() {
            Some(file) => Some(self.save_file(file).await?),
            None => None,
        };

        let fields = TranslationFields {
            name: request.name,
            description: request.description,
            details: request.details,
            seo_description: request.seo_description,
            seo_title: request.seo_title,
            seo_alias: request.seo_alias,
        };

        match self
            .repository
            .update_product(&key, fields, thumbnail.clone())
            .await
        {
            Ok(replaced) => {
                self.discard_path(replaced).await;
                info!(product_id = key.product_id, "Product updated");
                Ok(())
            }
            Err(err) => {
                self.discard(thumbnail).await;
                Err(err)
            }
        }
    }

    /// Returns whether the stored price changed.
    #[instrument(skip(self))]
    pub async fn update_price(&self, product_id: i32, new_price: Decimal) -> Result<bool, CatalogError> {
        check_prices(new_price, Decimal::ZERO)?;
        self.repository.set_price(product_id, new_price).await
    }

    /// Adds `added_quantity` (possibly negative) to the stock.
    #[instrument(skip(self))]
    pub async fn update_stock(&self, product_id: i32, added_quantity: i32) -> Result<bool, CatalogError> {
        self.repository.add_stock(product_id, added_quantity).await
    }

    pub async fn add_view_count(&self, product_id: i32) -> Result<(), CatalogError> {
        self.repository.add_view_count(product_id).await?;
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn category_assign(
        &self,
        product_id: i32,
        request: CategoryAssignRequest,
    ) -> Result<ApiResult<bool>, CatalogError> {
        if self.repository.find_product(product_id).await?.is_none() {
            return Ok(ApiResult::error("not found"));
        }

        let selections: Vec<CategorySelection> = request
            .categories
            .into_iter()
            .map(|item| CategorySelection {
                name: item.name,
                selected: item.selected,
            })
            .collect();

        match self
            .repository
            .assign_categories(product_id, &selections)
            .await?
        {
            AssignOutcome::Applied => Ok(ApiResult::success(true)),
            AssignOutcome::UnknownCategory(name) => {
                warn!(product_id, category = %name, "Category assignment rejected");
                Ok(ApiResult::error(format!("Cannot find a category named {name}")))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, product_id: i32) -> Result<(), CatalogError> {
        let Some(image_paths) = self.repository.delete_product(product_id).await? else {
            return Err(CatalogError::product_not_found(product_id));
        };
        info!(product_id, "Product deleted");

        for image_path in image_paths {
            self.discard_path(Some(image_path)).await;
        }
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn add_image(
        &self,
        product_id: i32,
        request: ProductImageCreateRequest,
    ) -> Result<i32, CatalogError> {
        request.validate()?;
        if self.repository.find_product(product_id).await?.is_none() {
            return Err(CatalogError::product_not_found(product_id));
        }

        let file = self.save_file(&request.image_file).await?;
        let new_image = NewImage {
            product_id,
            caption: request.caption,
            is_default: request.is_default,
            sort_order: request.sort_order,
            file: file.clone(),
        };

        match self.repository.insert_image(new_image).await {
            Ok(image) => {
                info!(product_id, image_id = image.id, "Image added");
                Ok(image.id)
            }
            Err(err) => {
                self.discard(Some(file)).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self, request))]
    pub async fn update_image(
        &self,
        image_id: i32,
        request: ProductImageUpdateRequest,
    ) -> Result<(), CatalogError> {
        request.validate()?;
        if self.repository.find_image(image_id).await?.is_none() {
            return Err(CatalogError::image_not_found(image_id));
        }

        let file = match request.image_file.as_ref() {
            Some(upload) => Some(self.save_file(upload).await?),
            None => None,
        };
        let changes = ImageChanges {
            caption: request.caption,
            is_default: request.is_default,
            sort_order: request.sort_order,
            file: file.clone(),
        };

        match self.repository.update_image(image_id, changes).await {
            Ok(replaced) => {
                self.discard_path(replaced).await;
                info!(image_id, "Image updated");
                Ok(())
            }
            Err(err) => {
                self.discard(file).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_image(&self, image_id: i32) -> Result<(), CatalogError> {
        let Some(image_path) = self.repository.delete_image(image_id).await? else {
            return Err(CatalogError::image_not_found(image_id));
        };
        info!(image_id, "Image removed");

        self.discard_path(Some(image_path)).await;
        Ok(())
    }

    pub async fn get_image_by_id(&self, image_id: i32) -> Result<ProductImageView, CatalogError> {
        let image = self
            .repository
            .find_image(image_id)
            .await?
            .ok_or_else(|| CatalogError::image_not_found(image_id))?;
        let url = self.storage.get_file_url(&image.image_path);
        Ok(ProductImageView::new(image, url))
    }

    pub async fn get_list_images(&self, product_id: i32) -> Result<Vec<ProductImageView>, CatalogError> {
        let images = self.repository.find_images(product_id).await?;
        Ok(images
            .into_iter()
            .map(|image| {
                let url = self.storage.get_file_url(&image.image_path);
                ProductImageView::new(image, url)
            })
            .collect())
    }

    /// Stores an upload under a fresh `<uuid>.<ext>` name.
    async fn save_file(&self, file: &FileUpload) -> Result<StoredFile, CatalogError> {
        let file_name = match file.extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let mut reader: &[u8] = &file.data;
        self.storage.save_file(&mut reader, &file_name).await?;

        Ok(StoredFile {
            image_path: file_name,
            file_size: file.len(),
        })
    }

    async fn discard(&self, file: Option<StoredFile>) {
        self.discard_path(file.map(|file| file.image_path)).await;
    }

    async fn discard_path(&self, image_path: Option<String>) {
        let Some(image_path) = image_path else {
            return;
        };
        if let Err(err) = self.storage.delete_file(&image_path).await {
            warn!(file = %image_path, error = %err, "Failed to delete unreferenced file");
        }
    }
}

fn check_prices(price: Decimal, original_price: Decimal) -> Result<(), CatalogError> {
    if price < Decimal::ZERO || original_price < Decimal::ZERO {
        return Err(CatalogError::Validation(
            "Prices must not be negative".to_owned(),
        ));
    }
    Ok(())
}
