//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use isavs_core::config::AppConfig;
use isavs_database::DatabasePool;
use isavs_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db: DatabasePool,
    /// Dashboard realtime engine
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    /// Bundles the process-wide dependencies.
    pub fn new(config: AppConfig, db: DatabasePool, realtime: Arc<RealtimeEngine>) -> Self {
        Self {
            config: Arc::new(config),
            db,
            realtime,
        }
    }
}
