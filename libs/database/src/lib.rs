//! Document store plumbing: MongoDB configuration, connect-with-retry and
//! the readiness ping.
//!
//! # Features
//!
//! - `config` (default): `core_config::FromEnv` for [`mongodb::MongoConfig`]
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_database};
//! use core_config::FromEnv;
//!
//! let (client, db) = connect_database(&MongoConfig::from_env()?).await?;
//! let products = db.collection::<ProductDocument>("products");
//! ```

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryPolicy, retry_with_backoff};
