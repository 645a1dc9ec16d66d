//! HTTP handlers for email/password sessions

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    clear_session_cookie,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
    session_cookie, CurrentUser, SessionKeys, ValidatedJson,
};
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, RegisterRequest, UserIdentity};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the auth routes
#[derive(OpenApi)]
#[openapi(
    paths(register, login, logout, session),
    components(
        schemas(UserIdentity, LoginRequest, RegisterRequest),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Email/password sessions")
    )
)]
pub struct ApiDoc;

/// Shared state for the auth routes
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub sessions: SessionKeys,
    /// Adds `Secure` to session cookies (HTTPS deployments)
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            sessions: self.sessions.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// Create the auth router
pub fn router<R: UserRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
        .with_state(state)
}

fn cookie_header(value: String) -> UserResult<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|e| UserError::Session(format!("invalid cookie: {e}")))
}

/// Issues a session token for `identity` and sets it as the session cookie.
fn start_session<R: UserRepository>(
    state: &AuthState<R>,
    status: StatusCode,
    identity: UserIdentity,
) -> UserResult<Response> {
    let token = state
        .sessions
        .issue(&identity.id.to_string(), &identity.email, &identity.name)
        .map_err(|e| UserError::Session(e.to_string()))?;

    let cookie = cookie_header(session_cookie(
        &token,
        state.sessions.ttl_secs(),
        state.secure_cookies,
    ))?;

    tracing::info!(user_id = %identity.id, "Session started");
    Ok((
        status,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(identity),
    )
        .into_response())
}

/// Register a new account and sign it in
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; session cookie set", body = UserIdentity),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<Response> {
    let identity = state.service.register(input).await?;
    start_session(&state, StatusCode::CREATED, identity)
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = UserIdentity),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Response> {
    let identity = state.service.authorize(&input.email, &input.password).await?;
    start_session(&state, StatusCode::OK, identity)
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Session cookie cleared")
    )
)]
async fn logout<R: UserRepository>(State(state): State<AuthState<R>>) -> UserResult<Response> {
    let cookie = cookie_header(clear_session_cookie(state.secure_cookies))?;
    Ok((StatusCode::NO_CONTENT, AppendHeaders([(header::SET_COOKIE, cookie)])).into_response())
}

/// The signed-in user
#[utoipa::path(
    get,
    path = "/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Current session", body = UserIdentity),
        (status = 401, response = UnauthorizedResponse)
    ),
    security(("session" = []))
)]
async fn session<R: UserRepository>(
    State(state): State<AuthState<R>>,
    CurrentUser(claims): CurrentUser,
) -> UserResult<Json<UserIdentity>> {
    let id = claims.user_id().ok_or(UserError::UnknownEmail)?;
    let identity = state
        .service
        .get_user(id)
        .await
        .map_err(|err| match err {
            UserError::NotFound(_) => UserError::UnknownEmail,
            other => other,
        })?;
    Ok(Json(identity))
}
