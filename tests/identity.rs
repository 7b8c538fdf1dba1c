mod common;

use common::TestCatalog;
use eshop_catalog::entities::identity::{app_role, app_user, app_user_role};
use eshop_catalog::entities::{seed_identity, ADMIN_ROLE_NAME, ADMIN_USER_NAME};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_seed_identity_creates_admin_once() {
    let catalog = TestCatalog::new().await;

    seed_identity(&catalog.db, "S3cret!").await.expect("Failed to seed");
    seed_identity(&catalog.db, "other").await.expect("Failed to reseed");

    let admin = app_user::Entity::find()
        .filter(app_user::Column::UserName.eq(ADMIN_USER_NAME))
        .one(&*catalog.db)
        .await
        .expect("Failed to query users")
        .expect("Admin user not found");
    assert!(admin.check_hash("S3cret!").is_ok());
    assert!(admin.check_hash("other").is_err());

    let role = app_role::Entity::find()
        .filter(app_role::Column::Name.eq(ADMIN_ROLE_NAME))
        .one(&*catalog.db)
        .await
        .expect("Failed to query roles")
        .expect("Admin role not found");

    let memberships = app_user_role::Entity::find()
        .filter(app_user_role::Column::UserId.eq(admin.id))
        .filter(app_user_role::Column::RoleId.eq(role.id))
        .count(&*catalog.db)
        .await
        .expect("Failed to count memberships");
    assert_eq!(memberships, 1);

    let users = app_user::Entity::find()
        .count(&*catalog.db)
        .await
        .expect("Failed to count users");
    assert_eq!(users, 1);
}
