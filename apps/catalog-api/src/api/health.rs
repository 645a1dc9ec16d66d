//! Readiness endpoint

use axum::{extract::State, routing::get, Json, Router};
use axum::http::StatusCode;
use axum_helpers::{run_health_checks, HealthCheckFuture};
use database::mongodb::check_health;
use serde_json::Value;

use crate::state::AppState;

type ProbeResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

/// `200` once MongoDB answers a ping, `503` otherwise.
async fn ready(State(state): State<AppState>) -> ProbeResult {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async { check_health(&state.db).await.map_err(|e| e.to_string()) }),
    )];
    run_health_checks(checks).await
}

/// Router exposing `GET /ready`.
pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
