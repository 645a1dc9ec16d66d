use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid product fields: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("{0}")]
    Payload(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::InvalidFields(errors) => AppError::ValidationError(errors),
            ProductError::Payload(msg) => AppError::InvalidPayload(msg),
            ProductError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            ProductError::Storage(msg) => AppError::Storage(msg),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}
