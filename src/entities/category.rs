use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sort_order: i32,
    #[sea_orm(default_value = false)]
    pub is_show_on_home: bool,
    pub parent_id: Option<i32>,
    pub status: Status,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::entities::category_translation::Entity")]
    CategoryTranslation,
    #[sea_orm(has_many = "crate::entities::product_in_category::Entity")]
    ProductInCategory,
}

impl Related<crate::entities::category_translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryTranslation.def()
    }
}

impl Related<crate::entities::product_in_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductInCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "category_status_enum",
    db_type = "String(StringLen::N(16))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}
