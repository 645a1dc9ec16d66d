use super::jwt::SessionClaims;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The signed-in user for this request.
///
/// Reads the claims left by [`session_middleware`](super::session_middleware);
/// rejects with `401 UNAUTHORIZED` when there are none.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionClaims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionConfig, SessionKeys, session_middleware};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    fn app(keys: SessionKeys) -> Router {
        Router::new()
            .route(
                "/me",
                get(|CurrentUser(claims): CurrentUser| async move { claims.email }),
            )
            .layer(middleware::from_fn_with_state(keys, session_middleware))
    }

    fn keys() -> SessionKeys {
        SessionKeys::new(&SessionConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap())
    }

    #[tokio::test]
    async fn test_missing_session_is_unauthorized() {
        let response = app(keys())
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let request = Request::builder()
            .uri("/me")
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        let response = app(keys()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cookie_session_is_accepted() {
        let keys = keys();
        let token = keys.issue("u1", "ada@example.com", "Ada").unwrap();
        let request = Request::builder()
            .uri("/me")
            .header(header::COOKIE, format!("session_token={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app(keys).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
