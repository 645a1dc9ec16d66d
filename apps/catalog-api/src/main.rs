//! Catalog API - product catalog REST server

use axum_helpers::server::{create_production_app, create_router, health_router};
use axum_helpers::SessionKeys;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::connect_database;
use domain_products::CloudinaryStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(url = %config.mongodb.redacted_url(), "Connecting to MongoDB");
    let (mongo_client, db) = connect_database(&config.mongodb).await?;
    info!(database = %config.mongodb.database, "Connected to MongoDB");

    let state = AppState {
        sessions: SessionKeys::new(&config.session),
        images: Arc::new(CloudinaryStore::new(config.cloudinary.clone())),
        config,
        mongo_client,
        db,
    };

    api::init_indexes(&state).await?;

    let router = create_router::<openapi::ApiDoc>(api::routes(&state))?
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!(
        address = %state.config.server.address(),
        environment = ?state.config.environment,
        "Starting Catalog API"
    );

    let server_config = state.config.server.clone();
    create_production_app(router, &server_config, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        state.mongo_client.shutdown().await;
        info!("MongoDB connection closed");
    })
    .await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
