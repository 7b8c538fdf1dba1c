pub mod category;
pub mod category_translation;
pub mod identity;
pub mod product;
pub mod product_image;
pub mod product_in_category;
pub mod product_translation;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Schema,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::identity::{app_role, app_user, app_user_role};

pub const ADMIN_USER_NAME: &str = "admin";
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Creates every catalog and identity table that does not exist yet.
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut tables = vec![
        schema.create_table_from_entity(product::Entity),
        schema.create_table_from_entity(product_translation::Entity),
        schema.create_table_from_entity(product_image::Entity),
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(category_translation::Entity),
        schema.create_table_from_entity(product_in_category::Entity),
        schema.create_table_from_entity(app_user::Entity),
        schema.create_table_from_entity(app_role::Entity),
        schema.create_table_from_entity(identity::app_user_claim::Entity),
        schema.create_table_from_entity(app_user_role::Entity),
        schema.create_table_from_entity(identity::app_user_login::Entity),
        schema.create_table_from_entity(identity::app_role_claim::Entity),
        schema.create_table_from_entity(identity::app_user_token::Entity),
    ];

    for table in tables.iter_mut() {
        db.execute(backend.build(table.if_not_exists())).await?;
    }

    let mut indexes = schema.create_index_from_entity(product_image::Entity);
    indexes.extend(schema.create_index_from_entity(category_translation::Entity));
    for index in indexes.iter_mut() {
        db.execute(backend.build(index.if_not_exists())).await?;
    }

    tracing::info!("Database schema is ready");
    Ok(())
}

/// Seeds the admin role and account. Does nothing when the account exists.
pub async fn seed_identity(db: &DatabaseConnection, admin_password: &str) -> Result<(), DbErr> {
    let existing = app_user::Entity::find()
        .filter(app_user::Column::UserName.eq(ADMIN_USER_NAME))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(admin_password.as_bytes(), &salt)
        .map_err(|err| DbErr::Custom(format!("Failed to hash password: {err}")))?
        .to_string();

    let role_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let admin_role = app_role::ActiveModel {
        id: Set(role_id),
        name: Set(ADMIN_ROLE_NAME.to_owned()),
        description: Set("Administrator role".to_owned()),
    };

    let admin = app_user::ActiveModel {
        id: Set(user_id),
        user_name: Set(ADMIN_USER_NAME.to_owned()),
        email: Set("admin@eshop.local".to_owned()),
        password_hash: Set(password_hash),
        first_name: Set("Shop".to_owned()),
        last_name: Set("Admin".to_owned()),
    };

    let membership = app_user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_id),
    };

    let txn = db.begin().await?;
    let seeded = async {
        app_role::Entity::insert(admin_role).exec(&txn).await?;
        app_user::Entity::insert(admin).exec(&txn).await?;
        app_user_role::Entity::insert(membership)
            .exec_without_returning(&txn)
            .await?;
        Ok::<_, DbErr>(())
    }
    .await;

    match seeded {
        Ok(_) => {
            txn.commit().await?;
            tracing::info!(user = ADMIN_USER_NAME, "Seeded admin account");
            Ok(())
        }
        Err(err) => {
            let _ = txn.rollback().await;
            Err(err)
        }
    }
}
