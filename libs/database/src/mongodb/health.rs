use mongodb::{Database, bson::doc};
use std::time::Instant;

use crate::common::{DatabaseError, DatabaseResult};

/// Pings the database; used by the readiness endpoint.
pub async fn check_health(database: &Database) -> DatabaseResult<()> {
    let started = Instant::now();

    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    tracing::debug!(
        database = database.name(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "MongoDB ping ok"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    #[tokio::test]
    #[ignore] // Requires a running MongoDB
    async fn test_check_health() {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        assert!(check_health(&client.database("catalog_test")).await.is_ok());
    }
}
