use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, IntoCondition, LikeExpr, Query},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    JoinType, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait,
};

use super::{
    AssignOutcome, CategoryRepository, CategoryRow, CategorySelection, ImageChanges, NewCategory,
    NewImage, NewProduct, ProductFilter, ProductRepository, ProductRow, StoredFile,
    TranslationFields, TranslationKey,
};
use crate::entities::{
    category, category_translation,
    product::{self, Entity as ProductEntity},
    product_image::{self, Entity as ImageEntity},
    product_in_category, product_translation,
};
use crate::error::CatalogError;

const THUMBNAIL_CAPTION: &str = "Thumbnail Image";
const LIKE_ESCAPE: char = '!';

/// `%keyword%` with the LIKE wildcards in `keyword` matched literally.
fn contains_pattern(keyword: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

#[derive(Clone, Debug)]
pub struct DbRepository {
    db: Arc<DatabaseConnection>,
}

impl DbRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, CatalogError> {
        Ok(self.db.begin().await?)
    }
}

/// Commits on success, rolls back on any failure.
async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, CatalogError>,
) -> Result<T, CatalogError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}

/// Clears the default flag on every image of `product_id` except `keep`.
async fn clear_default_images(
    txn: &DatabaseTransaction,
    product_id: i32,
    keep: Option<i32>,
) -> Result<(), DbErr> {
    let mut update = ImageEntity::update_many()
        .col_expr(product_image::Column::IsDefault, Expr::value(false))
        .filter(product_image::Column::ProductId.eq(product_id))
        .filter(product_image::Column::IsDefault.eq(true));
    if let Some(keep) = keep {
        update = update.filter(product_image::Column::Id.ne(keep));
    }
    update.exec(txn).await?;
    Ok(())
}

fn default_image_query(product_id: i32) -> sea_orm::Select<ImageEntity> {
    ImageEntity::find()
        .filter(product_image::Column::ProductId.eq(product_id))
        .filter(product_image::Column::IsDefault.eq(true))
        .order_by_asc(product_image::Column::SortOrder)
        .order_by_asc(product_image::Column::Id)
}

#[async_trait]
impl ProductRepository for DbRepository {
    async fn find_product(&self, product_id: i32) -> Result<Option<product::Model>, CatalogError> {
        Ok(ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?)
    }

    async fn find_translation(
        &self,
        key: &TranslationKey,
    ) -> Result<Option<product_translation::Model>, CatalogError> {
        Ok(
            product_translation::Entity::find_by_id((key.product_id, key.language_id.clone()))
                .one(&*self.db)
                .await?,
        )
    }

    async fn find_category_names(&self, key: &TranslationKey) -> Result<Vec<String>, CatalogError> {
        let names = category_translation::Entity::find()
            .select_only()
            .column(category_translation::Column::Name)
            .join(
                JoinType::InnerJoin,
                category_translation::Relation::Category.def(),
            )
            .join(
                JoinType::InnerJoin,
                category::Relation::ProductInCategory.def(),
            )
            .filter(product_in_category::Column::ProductId.eq(key.product_id))
            .filter(category_translation::Column::LanguageId.eq(key.language_id.as_str()))
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Id)
            .into_tuple::<String>()
            .all(&*self.db)
            .await?;
        Ok(names)
    }

    async fn find_default_image(
        &self,
        product_id: i32,
    ) -> Result<Option<product_image::Model>, CatalogError> {
        Ok(default_image_query(product_id).one(&*self.db).await?)
    }

    async fn find_page(
        &self,
        filter: &ProductFilter,
        page_index: u64,
        page_size: u64,
    ) -> Result<(Vec<ProductRow>, u64), CatalogError> {
        let mut query = ProductEntity::find()
            .select_only()
            .column_as(product::Column::Id, "id")
            .column_as(product::Column::Price, "price")
            .column_as(product::Column::OriginalPrice, "original_price")
            .column_as(product::Column::Stock, "stock")
            .column_as(product::Column::ViewCount, "view_count")
            .column_as(product::Column::DateCreated, "date_created")
            .column_as(product_translation::Column::LanguageId, "language_id")
            .column_as(product_translation::Column::Name, "name")
            .column_as(product_translation::Column::Description, "description")
            .column_as(product_translation::Column::Details, "details")
            .column_as(product_translation::Column::SeoDescription, "seo_description")
            .column_as(product_translation::Column::SeoTitle, "seo_title")
            .column_as(product_translation::Column::SeoAlias, "seo_alias")
            .column_as(product_image::Column::ImagePath, "thumbnail_image")
            .join(
                JoinType::InnerJoin,
                product::Relation::ProductTranslation.def(),
            )
            .join(
                JoinType::LeftJoin,
                product::Relation::ProductImage
                    .def()
                    .on_condition(|_left, right| {
                        Expr::col((right, product_image::Column::IsDefault))
                            .eq(true)
                            .into_condition()
                    }),
            )
            .filter(product_translation::Column::LanguageId.eq(filter.language_id.as_str()));

        if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
            query = query
                .filter(product_translation::Column::Name.like(contains_pattern(keyword.trim())));
        }

        if let Some(category_id) = filter.category_id.filter(|id| *id != 0) {
            query = query.filter(
                product::Column::Id.in_subquery(
                    Query::select()
                        .column(product_in_category::Column::ProductId)
                        .from(product_in_category::Entity)
                        .and_where(product_in_category::Column::CategoryId.eq(category_id))
                        .to_owned(),
                ),
            );
        }

        let paginator = query
            .order_by_asc(product::Column::Id)
            .into_model::<ProductRow>()
            .paginate(&*self.db, page_size);

        let total = paginator.num_items().await?;

        // The offset must fit the database's signed 64-bit range.
        let page = page_index.saturating_sub(1);
        let in_range = page
            .checked_mul(page_size)
            .is_some_and(|offset| offset < total && offset <= i64::MAX as u64);
        if !in_range {
            return Ok((Vec::new(), total));
        }
        let rows = paginator.fetch_page(page).await?;

        Ok((rows, total))
    }

    async fn insert_product(&self, new_product: NewProduct) -> Result<i32, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            let created = product::ActiveModel {
                price: Set(new_product.price),
                original_price: Set(new_product.original_price),
                stock: Set(new_product.stock),
                view_count: Set(0),
                date_created: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            let fields = new_product.translation;
            let translation = product_translation::ActiveModel {
                product_id: Set(created.id),
                language_id: Set(new_product.language_id),
                name: Set(fields.name),
                description: Set(fields.description),
                details: Set(fields.details),
                seo_description: Set(fields.seo_description),
                seo_title: Set(fields.seo_title),
                seo_alias: Set(fields.seo_alias),
            };
            product_translation::Entity::insert(translation)
                .exec_without_returning(&txn)
                .await?;

            if let Some(file) = new_product.thumbnail {
                product_image::ActiveModel {
                    product_id: Set(created.id),
                    image_path: Set(file.image_path),
                    caption: Set(Some(THUMBNAIL_CAPTION.to_owned())),
                    is_default: Set(true),
                    date_created: Set(Utc::now()),
                    sort_order: Set(1),
                    file_size: Set(file.file_size),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }

            Ok(created.id)
        }
        .await;

        finish(txn, result).await
    }

    async fn update_product(
        &self,
        key: &TranslationKey,
        fields: TranslationFields,
        thumbnail: Option<StoredFile>,
    ) -> Result<Option<String>, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            let translation =
                product_translation::Entity::find_by_id((key.product_id, key.language_id.clone()))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| CatalogError::product_not_found(key.product_id))?;

            let mut translation: product_translation::ActiveModel = translation.into();
            translation.name = Set(fields.name);
            translation.description = Set(fields.description);
            translation.details = Set(fields.details);
            translation.seo_description = Set(fields.seo_description);
            translation.seo_title = Set(fields.seo_title);
            translation.seo_alias = Set(fields.seo_alias);
            translation.update(&txn).await?;

            let Some(file) = thumbnail else {
                return Ok(None);
            };

            match default_image_query(key.product_id).one(&txn).await? {
                Some(image) => {
                    let replaced = image.image_path.clone();
                    let mut image: product_image::ActiveModel = image.into();
                    image.image_path = Set(file.image_path);
                    image.file_size = Set(file.file_size);
                    image.update(&txn).await?;
                    Ok(Some(replaced))
                }
                None => {
                    clear_default_images(&txn, key.product_id, None).await?;
                    product_image::ActiveModel {
                        product_id: Set(key.product_id),
                        image_path: Set(file.image_path),
                        caption: Set(Some(THUMBNAIL_CAPTION.to_owned())),
                        is_default: Set(true),
                        date_created: Set(Utc::now()),
                        sort_order: Set(1),
                        file_size: Set(file.file_size),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await?;
                    Ok(None)
                }
            }
        }
        .await;

        finish(txn, result).await
    }

    async fn set_price(&self, product_id: i32, price: Decimal) -> Result<bool, CatalogError> {
        let product = ProductEntity::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| CatalogError::product_not_found(product_id))?;

        if product.price == price {
            return Ok(false);
        }

        let mut product: product::ActiveModel = product.into();
        product.price = Set(price);
        product.update(&*self.db).await?;
        Ok(true)
    }

    async fn add_stock(&self, product_id: i32, delta: i32) -> Result<bool, CatalogError> {
        if self.find_product(product_id).await?.is_none() {
            return Err(CatalogError::product_not_found(product_id));
        }
        if delta == 0 {
            return Ok(false);
        }

        // Only rows whose new stock stays within i32 are touched.
        let bound = if delta > 0 {
            product::Column::Stock.lte(i32::MAX - delta)
        } else {
            product::Column::Stock.gte(i32::MIN - delta)
        };
        let result = ProductEntity::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).add(delta),
            )
            .filter(product::Column::Id.eq(product_id))
            .filter(bound)
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CatalogError::Validation(format!(
                "Adding {delta} would take the stock of product {product_id} out of range"
            )));
        }
        Ok(true)
    }

    async fn add_view_count(&self, product_id: i32) -> Result<bool, CatalogError> {
        let result = ProductEntity::update_many()
            .col_expr(
                product::Column::ViewCount,
                Expr::col(product::Column::ViewCount).add(1),
            )
            .filter(product::Column::Id.eq(product_id))
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CatalogError::product_not_found(product_id));
        }
        Ok(true)
    }

    async fn assign_categories(
        &self,
        product_id: i32,
        selections: &[CategorySelection],
    ) -> Result<AssignOutcome, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            for selection in selections {
                let category_id = category_translation::Entity::find()
                    .select_only()
                    .column(category_translation::Column::CategoryId)
                    .filter(category_translation::Column::Name.eq(selection.name.as_str()))
                    .order_by_asc(category_translation::Column::CategoryId)
                    .into_tuple::<i32>()
                    .one(&txn)
                    .await?;

                let Some(category_id) = category_id else {
                    return Ok(AssignOutcome::UnknownCategory(selection.name.clone()));
                };

                let existing = product_in_category::Entity::find_by_id((product_id, category_id))
                    .one(&txn)
                    .await?;

                match (existing, selection.selected) {
                    (None, true) => {
                        let row = product_in_category::ActiveModel {
                            product_id: Set(product_id),
                            category_id: Set(category_id),
                        };
                        product_in_category::Entity::insert(row)
                            .exec_without_returning(&txn)
                            .await?;
                    }
                    (Some(row), false) => {
                        row.delete(&txn).await?;
                    }
                    _ => {}
                }
            }
            Ok(AssignOutcome::Applied)
        }
        .await;

        match result {
            Ok(AssignOutcome::Applied) => finish(txn, Ok(AssignOutcome::Applied)).await,
            Ok(unknown) => {
                txn.rollback().await?;
                Ok(unknown)
            }
            Err(err) => finish(txn, Err(err)).await,
        }
    }

    async fn delete_product(&self, product_id: i32) -> Result<Option<Vec<String>>, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            let Some(product) = ProductEntity::find_by_id(product_id).one(&txn).await? else {
                return Ok(None);
            };

            let images = ImageEntity::find()
                .filter(product_image::Column::ProductId.eq(product_id))
                .all(&txn)
                .await?;

            product_in_category::Entity::delete_many()
                .filter(product_in_category::Column::ProductId.eq(product_id))
                .exec(&txn)
                .await?;
            ImageEntity::delete_many()
                .filter(product_image::Column::ProductId.eq(product_id))
                .exec(&txn)
                .await?;
            product_translation::Entity::delete_many()
                .filter(product_translation::Column::ProductId.eq(product_id))
                .exec(&txn)
                .await?;
            product.delete(&txn).await?;

            Ok(Some(images.into_iter().map(|image| image.image_path).collect()))
        }
        .await;

        finish(txn, result).await
    }

    async fn insert_image(&self, image: NewImage) -> Result<product_image::Model, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            if image.is_default {
                clear_default_images(&txn, image.product_id, None).await?;
            }

            let created = product_image::ActiveModel {
                product_id: Set(image.product_id),
                image_path: Set(image.file.image_path),
                caption: Set(image.caption),
                is_default: Set(image.is_default),
                date_created: Set(Utc::now()),
                sort_order: Set(image.sort_order),
                file_size: Set(image.file.file_size),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            Ok(created)
        }
        .await;

        finish(txn, result).await
    }

    async fn find_image(&self, image_id: i32) -> Result<Option<product_image::Model>, CatalogError> {
        Ok(ImageEntity::find_by_id(image_id)
            .one(&*self.db)
            .await?)
    }

    async fn find_images(&self, product_id: i32) -> Result<Vec<product_image::Model>, CatalogError> {
        Ok(ImageEntity::find()
            .filter(product_image::Column::ProductId.eq(product_id))
            .order_by_asc(product_image::Column::SortOrder)
            .order_by_asc(product_image::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn update_image(
        &self,
        image_id: i32,
        changes: ImageChanges,
    ) -> Result<Option<String>, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            let image = ImageEntity::find_by_id(image_id)
                .one(&txn)
                .await?
                .ok_or_else(|| CatalogError::image_not_found(image_id))?;

            if changes.is_default {
                clear_default_images(&txn, image.product_id, Some(image_id)).await?;
            }

            let replaced = changes.file.as_ref().map(|_| image.image_path.clone());

            let mut image: product_image::ActiveModel = image.into();
            image.caption = Set(changes.caption);
            image.is_default = Set(changes.is_default);
            image.sort_order = Set(changes.sort_order);
            if let Some(file) = changes.file {
                image.image_path = Set(file.image_path);
                image.file_size = Set(file.file_size);
            }
            image.update(&txn).await?;

            Ok(replaced)
        }
        .await;

        finish(txn, result).await
    }

    async fn delete_image(&self, image_id: i32) -> Result<Option<String>, CatalogError> {
        let Some(image) = ImageEntity::find_by_id(image_id).one(&*self.db).await? else {
            return Ok(None);
        };

        let image_path = image.image_path.clone();
        let result = ImageEntity::delete_by_id(image_id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(image_path))
    }
}

#[async_trait]
impl CategoryRepository for DbRepository {
    async fn insert_category(&self, new_category: NewCategory) -> Result<i32, CatalogError> {
        let txn = self.begin().await?;

        let result: Result<_, CatalogError> = async {
            let created = category::ActiveModel {
                sort_order: Set(new_category.sort_order),
                is_show_on_home: Set(new_category.is_show_on_home),
                parent_id: Set(new_category.parent_id),
                status: Set(category::Status::Active),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            let translation = category_translation::ActiveModel {
                category_id: Set(created.id),
                language_id: Set(new_category.language_id),
                name: Set(new_category.name),
                seo_description: Set(new_category.seo_description),
                seo_title: Set(new_category.seo_title),
                seo_alias: Set(new_category.seo_alias),
            };
            category_translation::Entity::insert(translation)
                .exec_without_returning(&txn)
                .await?;

            Ok(created.id)
        }
        .await;

        finish(txn, result).await
    }

    async fn find_categories(&self, language_id: &str) -> Result<Vec<CategoryRow>, CatalogError> {
        Ok(category::Entity::find()
            .select_only()
            .column_as(category::Column::Id, "id")
            .column_as(category::Column::SortOrder, "sort_order")
            .column_as(category::Column::IsShowOnHome, "is_show_on_home")
            .column_as(category::Column::ParentId, "parent_id")
            .column_as(category::Column::Status, "status")
            .column_as(category_translation::Column::Name, "name")
            .join(
                JoinType::InnerJoin,
                category::Relation::CategoryTranslation.def(),
            )
            .filter(category_translation::Column::LanguageId.eq(language_id))
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Id)
            .into_model::<CategoryRow>()
            .all(&*self.db)
            .await?)
    }
}
