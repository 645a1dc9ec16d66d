//! Auth API routes

use axum::Router;
use domain_users::{handlers, AuthState, MongoUserRepository, UserService};

use crate::state::AppState;

/// Create auth router
pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(&state.db);
    handlers::router(AuthState {
        service: UserService::new(repository),
        sessions: state.sessions.clone(),
        secure_cookies: state.config.secure_cookies(),
    })
}

/// Initialize users indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoUserRepository::new(&state.db).init_indexes().await?;
    Ok(())
}
