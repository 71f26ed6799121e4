//! Top-level real-time engine that ties together the registry, publisher
//! and metrics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use isavs_core::config::RealtimeConfig;

use crate::connection::handle::ConnectionInfo;
use crate::connection::registry::ConnectionRegistry;
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};
use crate::publisher::EventPublisher;

/// Central real-time engine, constructed once by the composition root and
/// shared through application state.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Dashboard connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Event publisher.
    pub publisher: EventPublisher,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.registry.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new(&config, Arc::clone(&metrics)));
        let publisher = EventPublisher::new(Arc::clone(&registry));

        info!(
            buffer = config.channel_buffer_size,
            idle_timeout_seconds = config.idle_timeout_seconds,
            "Real-time engine initialized"
        );

        Self {
            registry,
            publisher,
            metrics,
            config,
        }
    }

    /// Realtime configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Current connections and counters.
    pub fn stats(&self) -> RealtimeStats {
        RealtimeStats {
            active_connections: self.registry.connection_count(),
            metrics: self.metrics.snapshot(),
            connections: self.registry.connections(),
        }
    }

    /// Closes every dashboard connection. Further connects are refused.
    pub fn shutdown(&self) -> usize {
        info!("Shutting down real-time engine");
        self.registry.close_all()
    }
}

/// Serializable engine statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeStats {
    /// Registered connections right now.
    pub active_connections: usize,
    /// Counters since start.
    pub metrics: MetricsSnapshot,
    /// Per-connection details.
    pub connections: Vec<ConnectionInfo>,
}
