use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "AppRoleClaims")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub role_id: Uuid,
    pub claim_type: Option<String>,
    pub claim_value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_role::Entity",
        from = "Column::RoleId",
        to = "super::app_role::Column::Id",
        on_delete = "Cascade"
    )]
    Role,
}

impl ActiveModelBehavior for ActiveModel {}
