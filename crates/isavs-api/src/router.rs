//! Route definitions for the ISAVS HTTP API.
//!
//! Service endpoints and the dashboard WebSocket live at the root;
//! token-guarded realtime management endpoints are mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, threading `AppState` through
/// `.with_state(state)`. Middleware is added by [`crate::app::build_app`].
///
/// The `/api/realtime` routes are only mounted when
/// `realtime.publish_token` is configured.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().merge(service_routes()).merge(ws_routes());

    if state.config.realtime.publish_token().is_some() {
        router = router.nest("/api", realtime_routes());
    } else {
        info!("realtime.publish_token not set, /api/realtime endpoints disabled");
    }

    router.with_state(state)
}

/// Root info and health checks
fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Dashboard event stream
fn ws_routes() -> Router<AppState> {
    Router::new().route("/ws/dashboard", get(handlers::ws::ws_dashboard))
}

/// Realtime stats and publishing; every handler takes `PublisherAuth`
fn realtime_routes() -> Router<AppState> {
    Router::new()
        .route("/realtime/stats", get(handlers::realtime::stats))
        .route("/realtime/events", post(handlers::realtime::publish_event))
}
