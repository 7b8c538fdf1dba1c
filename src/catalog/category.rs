use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::catalog::requests::CategoryCreateRequest;
use crate::catalog::views::CategoryView;
use crate::error::CatalogError;
use crate::repository::{CategoryRepository, NewCategory};

#[derive(Clone)]
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CategoryCreateRequest) -> Result<i32, CatalogError> {
        request.validate()?;

        let category_id = self
            .repository
            .insert_category(NewCategory {
                sort_order: request.sort_order,
                is_show_on_home: request.is_show_on_home,
                parent_id: request.parent_id,
                language_id: request.language_id,
                name: request.name,
                seo_description: request.seo_description,
                seo_title: request.seo_title,
                seo_alias: request.seo_alias,
            })
            .await?;

        info!(category_id, "Category created");
        Ok(category_id)
    }

    pub async fn get_all(&self, language_id: &str) -> Result<Vec<CategoryView>, CatalogError> {
        let rows = self.repository.find_categories(language_id).await?;
        Ok(rows.into_iter().map(CategoryView::from).collect())
    }
}
