//! Error codes carried in every [`ErrorResponse`](super::ErrorResponse).
//!
//! A code has three faces: the SCREAMING_SNAKE_CASE identifier clients
//! branch on, an integer for log queries, and a fallback message.
//!
//! | Range | Class                                  |
//! |-------|----------------------------------------|
//! | 1xxx  | malformed or rejected request input    |
//! | 2xxx  | identity and resource state            |
//! | 3xxx  | server side and upstream services      |
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::PayloadTooLarge.as_str(), "PAYLOAD_TOO_LARGE");
//! assert_eq!(ErrorCode::NotFound.code(), 2002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Field constraints failed (bad price, page below 1, short password)
    ValidationError,
    /// Path id is not a UUID
    InvalidUuid,
    /// JSON body missing, mistyped or unparsable
    JsonExtraction,
    /// Query string could not be deserialized
    InvalidQuery,
    /// Multipart body malformed or breaking the upload rules
    InvalidPayload,
    /// Uploaded file over the size ceiling
    PayloadTooLarge,

    /// No valid session, unknown email or wrong password
    Unauthorized,
    NotFound,
    /// Email already registered
    Conflict,

    /// MongoDB rejected or failed an operation
    DatabaseError,
    /// Image host rejected or failed an upload
    StorageError,
    InternalError,
}

struct Descriptor {
    name: &'static str,
    code: i32,
    message: &'static str,
}

impl ErrorCode {
    const fn descriptor(self) -> Descriptor {
        let (name, code, message) = match self {
            Self::ValidationError => ("VALIDATION_ERROR", 1001, "Request validation failed"),
            Self::InvalidUuid => ("INVALID_UUID", 1002, "Invalid UUID format"),
            Self::JsonExtraction => ("JSON_EXTRACTION", 1003, "Failed to parse request body"),
            Self::InvalidQuery => ("INVALID_QUERY", 1004, "Failed to parse query string"),
            Self::InvalidPayload => ("INVALID_PAYLOAD", 1005, "Invalid multipart payload"),
            Self::PayloadTooLarge => ("PAYLOAD_TOO_LARGE", 1006, "Uploaded file is too large"),

            Self::Unauthorized => ("UNAUTHORIZED", 2001, "Authentication required"),
            Self::NotFound => ("NOT_FOUND", 2002, "Resource not found"),
            Self::Conflict => ("CONFLICT", 2003, "Resource already exists"),

            Self::DatabaseError => ("DATABASE_ERROR", 3001, "Database error occurred"),
            Self::StorageError => ("STORAGE_ERROR", 3002, "Image storage error occurred"),
            Self::InternalError => ("INTERNAL_ERROR", 3003, "An internal server error occurred"),
        };
        Descriptor { name, code, message }
    }

    pub fn as_str(&self) -> &'static str {
        self.descriptor().name
    }

    /// Integer code used in structured logs.
    pub fn code(&self) -> i32 {
        self.descriptor().code
    }

    /// Fallback message; most errors carry a more specific one.
    pub fn default_message(&self) -> &'static str {
        self.descriptor().message
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
