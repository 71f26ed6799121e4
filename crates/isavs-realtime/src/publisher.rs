//! Publishing handle for components that produce dashboard events.

use std::sync::Arc;

use crate::connection::registry::{BroadcastReport, ConnectionRegistry};
use crate::message::types::DashboardEvent;

/// Cheaply clonable handle that pushes events to every open dashboard.
///
/// Handed to request handlers and services instead of the registry itself
/// so they can publish but not manage connections.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    registry: Arc<ConnectionRegistry>,
}

impl EventPublisher {
    /// Creates a publisher over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Broadcasts a prepared event.
    pub fn publish(&self, event: &DashboardEvent) -> BroadcastReport {
        self.registry.broadcast(event)
    }

    /// Broadcasts an `attendance_update` stamped now.
    pub fn attendance_update(&self, data: serde_json::Value) -> BroadcastReport {
        self.publish(&DashboardEvent::attendance_update(data))
    }

    /// Broadcasts an `anomaly_alert` stamped now.
    pub fn anomaly_alert(&self, data: serde_json::Value) -> BroadcastReport {
        self.publish(&DashboardEvent::anomaly_alert(data))
    }

    /// Number of dashboards that would receive the next event.
    pub fn audience(&self) -> usize {
        self.registry.connection_count()
    }
}
