use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub price: Decimal,
    pub original_price: Decimal,
    #[sea_orm(default_value = 0)]
    pub stock: i32,
    #[sea_orm(default_value = 0)]
    pub view_count: i32,
    pub date_created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::entities::product_translation::Entity")]
    ProductTranslation,
    #[sea_orm(has_many = "crate::entities::product_image::Entity")]
    ProductImage,
    #[sea_orm(has_many = "crate::entities::product_in_category::Entity")]
    ProductInCategory,
}

impl Related<crate::entities::product_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTranslation.def()
    }
}

impl Related<crate::entities::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductImage.def()
    }
}

impl Related<crate::entities::product_in_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductInCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
