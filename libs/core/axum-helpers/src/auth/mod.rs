//! Session authentication.
//!
//! - [`SessionKeys`] signs and verifies HS256 session tokens
//! - [`session_middleware`] decodes the token on every request
//! - [`CurrentUser`] gates handlers that need a signed-in user
//!
//! ```ignore
//! use axum_helpers::auth::{SessionConfig, SessionKeys, session_middleware};
//! use core_config::FromEnv;
//!
//! let keys = SessionKeys::new(&SessionConfig::from_env()?);
//! let app = Router::new()
//!     .route("/api/products", post(create))
//!     .layer(axum::middleware::from_fn_with_state(keys, session_middleware));
//! ```

pub mod config;
pub mod cookie;
pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use config::{DEFAULT_SESSION_TTL_SECS, SessionConfig};
pub use cookie::{SESSION_COOKIE, clear_session_cookie, session_cookie, token_from_headers};
pub use extractor::CurrentUser;
pub use jwt::{SessionClaims, SessionKeys};
pub use middleware::session_middleware;
