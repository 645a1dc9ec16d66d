//! Users Domain
//!
//! Email/password accounts and the session routes built on them.
//!
//! # Features
//!
//! - Registration with Argon2 password hashing
//! - Credential check (`authorize`) with distinct unknown-email and
//!   wrong-password failures
//! - Login, logout and session routes backed by signed session cookies
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, session cookies
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Password hashing, credential checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB + in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, identity, request bodies
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{SessionConfig, SessionKeys};
//! use domain_users::{handlers, AuthState, InMemoryUserRepository, UserService};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AuthState {
//!     service: UserService::new(InMemoryUserRepository::new()),
//!     sessions: SessionKeys::new(&SessionConfig::new("a-session-secret-of-at-least-32-chars")?),
//!     secure_cookies: false,
//! };
//!
//! let router = handlers::router(state);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, AuthState};
pub use models::{LoginRequest, RegisterRequest, User, UserIdentity};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
