//! Identity schema: users, roles and the renamed standard identity tables.
pub mod app_role;
pub mod app_role_claim;
pub mod app_user;
pub mod app_user_claim;
pub mod app_user_login;
pub mod app_user_role;
pub mod app_user_token;
