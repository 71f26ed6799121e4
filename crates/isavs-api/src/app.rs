//! Application builder — wires router + middleware + state into an Axum app
//! and runs it with graceful shutdown.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use isavs_core::AppResult;
use isavs_core::error::AppError;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the application on `listener` until `shutdown` resolves.
///
/// On shutdown the listener stops accepting, every dashboard connection is
/// closed, and in-flight requests get `server.shutdown_grace_seconds` to
/// finish before being dropped.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let realtime = Arc::clone(&state.realtime);
    let (stopping_tx, stopping_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, build_app(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown signal received, closing dashboard connections...");
            realtime.shutdown();
            let _ = stopping_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            return result.map_err(|e| AppError::internal(format!("Server error: {e}")));
        }
        Ok(()) = stopping_rx => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map_err(|e| AppError::internal(format!("Server error: {e}"))),
        Err(_) => {
            warn!(
                grace_seconds = grace.as_secs(),
                "Graceful shutdown timed out, dropping remaining connections"
            );
            Ok(())
        }
    }
}
