use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryPolicy, retry_with_backoff};

/// Builds a pooled client from `config` and pings the target database.
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(url = %config.redacted_url(), database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout);
    options.server_selection_timeout = Some(config.server_selection_timeout);
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database(&config.database)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect`] wrapped in exponential backoff.
pub async fn connect_with_retry(config: &MongoConfig, policy: RetryPolicy) -> DatabaseResult<Client> {
    retry_with_backoff(policy, || connect(config)).await
}

/// Connects with the default backoff and returns the configured database handle.
pub async fn connect_database(config: &MongoConfig) -> DatabaseResult<(Client, Database)> {
    let client = connect_with_retry(config, RetryPolicy::default()).await?;
    let database = client.database(&config.database);
    Ok((client, database))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_fails_without_network() {
        let config = MongoConfig::new("not-a-mongo-url", "catalog");
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Mongo(_)));
    }

    #[tokio::test]
    #[ignore] // Requires a running MongoDB
    async fn test_connect_local() {
        let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        assert!(connect(&MongoConfig::new(url, "catalog_test")).await.is_ok());
    }
}
