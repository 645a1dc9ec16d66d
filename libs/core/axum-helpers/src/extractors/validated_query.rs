//! Query string extractor with validation.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string extractor that deserializes then validates.
///
/// A query that fails to deserialize (e.g. `page=abc`) is rejected with
/// `400 INVALID_QUERY`; one that deserializes but fails validation
/// (e.g. `page=0`) with `400 VALIDATION_ERROR`.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedQuery(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Paging {
        #[validate(range(min = 1))]
        #[serde(default = "one")]
        page: u64,
    }

    fn one() -> u64 {
        1
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            get(|ValidatedQuery(p): ValidatedQuery<Paging>| async move { p.page.to_string() }),
        )
    }

    async fn status_for(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_valid_query_passes_through() {
        assert_eq!(status_for("/?page=3").await, StatusCode::OK);
        assert_eq!(status_for("/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_out_of_range_query_is_rejected() {
        assert_eq!(status_for("/?page=0").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unparsable_query_is_rejected() {
        assert_eq!(status_for("/?page=abc").await, StatusCode::BAD_REQUEST);
    }
}
