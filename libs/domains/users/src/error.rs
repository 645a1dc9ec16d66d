use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    /// Credential check failed on the email lookup.
    #[error("No user found with this email")]
    UnknownEmail,

    /// Credential check failed on the password.
    #[error("Incorrect password")]
    WrongPassword,

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("User {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid user fields: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("{0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UnknownEmail | UserError::WrongPassword => {
                AppError::Unauthorized(err.to_string())
            }
            UserError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::InvalidFields(errors) => AppError::ValidationError(errors),
            UserError::PasswordHash(msg) | UserError::Session(msg) => {
                tracing::error!(error = %msg, "Authentication backend failure");
                AppError::InternalServerError("An internal error occurred".to_string())
            }
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_credential_failures_are_401_with_distinct_messages() {
        assert_eq!(UserError::UnknownEmail.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(UserError::WrongPassword.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_ne!(
            UserError::UnknownEmail.to_string(),
            UserError::WrongPassword.to_string()
        );
    }

    #[test]
    fn test_status_per_class() {
        let cases = [
            (UserError::DuplicateEmail("a@b.test".into()), StatusCode::CONFLICT),
            (UserError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (UserError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (UserError::PasswordHash("salt".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (UserError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
