//! Service info and health check handlers.

use std::time::Duration;

use axum::Json;
use axum::extract::State;

use crate::dto::response::{
    DetailedHealthResponse, HealthResponse, RootResponse, SERVICE_NAME, SERVICE_TITLE,
};
use crate::state::AppState;

const DB_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: SERVICE_TITLE.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/docs".to_string(),
        health: "/health".to_string(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    // A closed pool (shutdown in progress) is reported without probing.
    let database_ok = !state.db.is_closed()
        && matches!(
            tokio::time::timeout(DB_PROBE_TIMEOUT, state.db.health_check()).await,
            Ok(Ok(true))
        );

    Json(DetailedHealthResponse {
        status: (if database_ok { "healthy" } else { "degraded" }).to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: (if database_ok { "connected" } else { "unavailable" }).to_string(),
        ws_connections: state.realtime.registry.connection_count(),
    })
}
