use std::sync::Arc;

use validator::Validate;

use crate::catalog::paging::PagedResult;
use crate::catalog::requests::{check_language, GetPublicProductPagingRequest};
use crate::catalog::views::ProductView;
use crate::error::CatalogError;
use crate::repository::{ProductFilter, ProductRepository, TranslationKey};

/// Read-only catalog browsing for storefront clients.
#[derive(Clone)]
pub struct PublicProductService {
    repository: Arc<dyn ProductRepository>,
}

impl PublicProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all_by_category_id(
        &self,
        language_id: &str,
        request: GetPublicProductPagingRequest,
    ) -> Result<PagedResult<ProductView>, CatalogError> {
        check_language(language_id)?;
        request.validate()?;

        let filter = ProductFilter {
            language_id: language_id.to_owned(),
            keyword: None,
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

    /// Product detail for a storefront visit; counts the visit first.
    pub async fn get_by_id(&self, product_id: i32, language_id: &str) -> Result<ProductView, CatalogError> {
        check_language(language_id)?;
        self.repository.add_view_count(product_id).await?;

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
}
