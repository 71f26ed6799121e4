//! ISAVS backend — Intelligent Student Attendance Verification System
//!
//! Main entry point that wires the crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use isavs_api::AppState;
use isavs_core::config::{AppConfig, LogFormat};
use isavs_core::error::AppError;
use isavs_database::DatabasePool;
use isavs_realtime::RealtimeEngine;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `ISAVS_CONFIG_DIR` (default `config/`) for the
/// environment named by `ISAVS_ENV`.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_dir = std::env::var("ISAVS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("ISAVS_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ISAVS backend v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database ─────────────────────────────────────────
    let db = DatabasePool::connect(&config.database).await?;

    // ── Step 2: Realtime engine ──────────────────────────────────
    let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));

    // ── Step 3: Bind listener ────────────────────────────────────
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(
        origins = ?config.server.cors.origin_list(),
        "ISAVS server listening on {}",
        addr
    );

    // ── Step 4: Serve until signalled ────────────────────────────
    let state = AppState::new(config, db.clone(), realtime);
    let served = isavs_api::serve(listener, state, shutdown_signal()).await;

    // ── Step 5: Close database after the server stops ────────────
    db.close().await;

    served?;
    tracing::info!("ISAVS server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
