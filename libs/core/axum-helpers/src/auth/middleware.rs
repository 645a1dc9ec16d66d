use super::cookie::token_from_headers;
use super::jwt::SessionKeys;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Session middleware.
///
/// Decodes the session token (Bearer header or `session_token` cookie) and,
/// when it verifies, stores the [`SessionClaims`](super::SessionClaims) as a
/// request extension. Requests without a valid session pass through
/// untouched; handlers that need one take [`CurrentUser`](super::CurrentUser).
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", api_routes)
///     .layer(axum::middleware::from_fn_with_state(keys, session_middleware));
/// ```
pub async fn session_middleware(
    State(keys): State<SessionKeys>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = token_from_headers(request.headers()) {
        match keys.verify(&token) {
            Ok(claims) => {
                tracing::debug!(user_id = %claims.sub, "Session verified");
                request.extensions_mut().insert(claims);
            }
            Err(e) => tracing::debug!("Session token rejected: {}", e),
        }
    }

    next.run(request).await
}
