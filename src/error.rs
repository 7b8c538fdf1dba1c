use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::middleware::logging::{to_response, ApiError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Payload exceeds {0} bytes")]
    PayloadTooLarge(usize),
}

impl CatalogError {
    pub fn product_not_found(id: i32) -> Self {
        CatalogError::NotFound(format!("Cannot find a product with id {id}"))
    }

    pub fn image_not_found(id: i32) -> Self {
        CatalogError::NotFound(format!("Cannot find an image with id {id}"))
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(err: ValidationErrors) -> Self {
        CatalogError::Validation(err.to_string())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            CatalogError::NotFound(message) => to_response(
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))),
                Err(ApiError::NotFound(message)),
            ),
            CatalogError::Validation(message) => to_response(
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))),
                Err(ApiError::ValidationFail(message)),
            ),
            CatalogError::PayloadTooLarge(limit) => {
                let tmp = format!("Payload too large, the limit is {limit} bytes");
                to_response(
                    (StatusCode::PAYLOAD_TOO_LARGE, Json(json!({ "error": tmp }))),
                    Err(ApiError::General(tmp)),
                )
            }
            CatalogError::Database(err) => to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                ),
                Err(ApiError::DbError(err.to_string())),
            ),
            CatalogError::Storage(err) => to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to access stored files" })),
                ),
                Err(ApiError::StorageError(err.to_string())),
            ),
        }
    }
}
