pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Standard error response body.
///
/// Every error leaving the API has this shape:
/// - `code`: integer code for logs (e.g., 2002)
/// - `error`: machine-readable identifier (e.g., "NOT_FOUND")
/// - `message`: human-readable message
/// - `details`: optional structured details (validation field errors)
///
/// ```json
/// {
///   "code": 2002,
///   "error": "NOT_FOUND",
///   "message": "Product 0190... not found"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Error type every handler ultimately returns.
///
/// Domain crates convert their own error enums into this one, so the whole
/// API answers with the same [`ErrorResponse`] envelope.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    // Extractor rejections
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),
    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),

    // Upstream failures echo their message to the client
    #[error("Database error: {0}")]
    Database(String),
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::JsonExtractorRejection(e) => (e.status(), ErrorCode::JsonExtraction),
            AppError::QueryExtractorRejection(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidQuery),
            AppError::ValidationError(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationError)
            }
            AppError::UuidError(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidUuid),
            AppError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidPayload),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, ErrorCode::PayloadTooLarge),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::StorageError),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        }
    }

    /// Client message and optional details.
    fn into_message(self) -> (String, Option<serde_json::Value>) {
        match self {
            AppError::JsonExtractorRejection(e) => (e.body_text(), None),
            AppError::QueryExtractorRejection(e) => (e.body_text(), None),
            AppError::ValidationError(e) => (
                ErrorCode::ValidationError.default_message().to_string(),
                Some(validation_details(&e)),
            ),
            AppError::UuidError(_) => (ErrorCode::InvalidUuid.default_message().to_string(), None),
            AppError::BadRequest(msg)
            | AppError::InvalidPayload(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Database(msg)
            | AppError::Storage(msg)
            | AppError::InternalServerError(msg) => (msg, None),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        let (message, details) = self.into_message();
        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });
        (status, body).into_response()
    }
}

/// Flattens validator errors into `{ field: [{ code, message, params }] }`.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<serde_json::Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::Value::Object(fields)
}
