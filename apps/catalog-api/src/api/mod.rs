//! API routes module

pub mod auth;
pub mod health;
pub mod products;

use axum::{middleware, Router};
use axum_helpers::session_middleware;

use crate::state::AppState;

/// All `/api` routes, behind the session middleware.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/auth", auth::router(state))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session_middleware,
        ))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await?;
    auth::init_indexes(state).await
}
