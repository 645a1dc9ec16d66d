//! Application state management

use axum_helpers::SessionKeys;
use database::mongodb::{Client, Database};
use domain_products::ImageStore;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mongo_client: Client,
    pub db: Database,
    pub sessions: SessionKeys,
    pub images: Arc<dyn ImageStore>,
}
