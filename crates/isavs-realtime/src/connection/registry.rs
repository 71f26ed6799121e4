//! Connection registry — tracks open dashboard sessions and fans events out
//! to them.
//!
//! Membership lives in a sharded concurrent map. A broadcast snapshots the
//! current handles and delivers outside any shard lock, so it runs safely
//! alongside connects and disconnects. Delivery is a non-blocking enqueue
//! onto each connection's bounded queue; the socket write happens in that
//! connection's own writer task.

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use isavs_core::AppResult;
use isavs_core::config::RealtimeConfig;
use isavs_core::error::AppError;

use crate::message::types::DashboardEvent;
use crate::metrics::RealtimeMetrics;

use super::handle::{ConnectionHandle, ConnectionId, ConnectionInfo};
use super::keepalive;

/// A freshly registered connection.
#[derive(Debug)]
pub struct Registration {
    /// Handle stored in the registry.
    pub handle: Arc<ConnectionHandle>,
    /// Frames to write to the socket, in order.
    pub outbound: mpsc::Receiver<Arc<str>>,
}

/// Per-call outcome of a broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastReport {
    /// Connections the event was queued for.
    pub delivered: usize,
    /// Connections that failed and were removed.
    pub failed: usize,
}

/// What happened to an inbound text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// A keep-alive reply was queued.
    Replied,
    /// Not a keep-alive probe; dropped.
    Ignored,
    /// The reply could not be queued and the connection was removed.
    ReplyFailed,
    /// No such connection is registered.
    UnknownConnection,
}

/// Registry of all open dashboard connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Connection ID → handle.
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// Outbound queue capacity per connection.
    buffer_size: usize,
    /// Parent of every connection's close token.
    shutdown: CancellationToken,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new(config: &RealtimeConfig, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            connections: DashMap::new(),
            buffer_size: config.channel_buffer_size.max(1),
            shutdown: CancellationToken::new(),
            metrics,
        }
    }

    /// Registers a newly upgraded connection.
    ///
    /// Returns the handle and the receiver its writer task drains. Fails
    /// once [`close_all`](Self::close_all) has run.
    pub fn connect(&self) -> AppResult<Registration> {
        if self.shutdown.is_cancelled() {
            return Err(AppError::service_unavailable(
                "Realtime registry is shutting down",
            ));
        }

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx, self.shutdown.child_token()));

        // Counted before the insert so a concurrent close_all never closes
        // a connection that was not yet opened.
        self.metrics.connection_opened();
        self.connections.insert(handle.id, Arc::clone(&handle));

        // close_all may have swept between the check above and the insert.
        if self.shutdown.is_cancelled() {
            if self.connections.remove(&handle.id).is_some() {
                self.metrics.connection_closed();
            }
            handle.mark_closed();
            return Err(AppError::service_unavailable(
                "Realtime registry is shutting down",
            ));
        }

        info!(
            conn_id = %handle.id,
            active = self.connections.len(),
            "Dashboard connection registered"
        );

        Ok(Registration {
            handle,
            outbound: rx,
        })
    }

    /// Removes a connection and closes it.
    ///
    /// Unknown or already removed IDs are a no-op; returns whether anything
    /// was removed.
    pub fn disconnect(&self, conn_id: &ConnectionId) -> bool {
        match self.connections.remove(conn_id) {
            Some((_, handle)) => {
                handle.mark_closed();
                self.metrics.connection_closed();
                info!(
                    conn_id = %conn_id,
                    active = self.connections.len(),
                    "Dashboard connection unregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Sends an event to every registered connection.
    ///
    /// Connections that cannot take the event are removed; the failure
    /// never reaches the caller beyond the counts in the report.
    pub fn broadcast(&self, event: &DashboardEvent) -> BroadcastReport {
        let payload: Arc<str> = match event.to_json() {
            Ok(json) => Arc::from(json),
            Err(e) => {
                error!(error = %e, event_type = %event.event_type, "Failed to serialize dashboard event");
                return BroadcastReport::default();
            }
        };

        let report = self.deliver_all(&self.snapshot(), payload);

        debug!(
            event_type = %event.event_type,
            delivered = report.delivered,
            failed = report.failed,
            "Dashboard event broadcast"
        );

        report
    }

    /// Delivers to `targets`. A target that fails only counts as failed if
    /// this call is what removed it; one that disconnected after the
    /// snapshot was taken is skipped.
    fn deliver_all(
        &self,
        targets: &[Arc<ConnectionHandle>],
        payload: Arc<str>,
    ) -> BroadcastReport {
        let mut delivered = 0usize;
        let mut failed = 0usize;

        for conn in targets {
            match conn.deliver(Arc::clone(&payload)) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    if self.disconnect(&conn.id) {
                        warn!(conn_id = %conn.id, error = %e, "Broadcast delivery failed, dropping connection");
                        failed += 1;
                    } else {
                        debug!(conn_id = %conn.id, "Skipping connection closed during broadcast");
                    }
                }
            }
        }

        self.metrics
            .broadcast_completed(delivered as u64, failed as u64);

        BroadcastReport { delivered, failed }
    }

    /// Processes an inbound text frame from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, text: &str) -> InboundOutcome {
        let Some(handle) = self.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return InboundOutcome::UnknownConnection;
        };

        handle.touch();
        self.metrics.message_received();

        let Some(reply) = keepalive::reply_to(text) else {
            debug!(conn_id = %conn_id, len = text.len(), "Ignoring inbound text");
            return InboundOutcome::Ignored;
        };

        match handle.deliver(Arc::from(reply)) {
            Ok(()) => {
                self.metrics.message_sent_count(1);
                InboundOutcome::Replied
            }
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "Failed to queue keep-alive reply");
                if self.disconnect(conn_id) {
                    self.metrics.delivery_failed();
                }
                InboundOutcome::ReplyFailed
            }
        }
    }

    /// Closes every connection and refuses new ones.
    ///
    /// Returns the number of connections closed.
    pub fn close_all(&self) -> usize {
        self.shutdown.cancel();

        let mut closed = 0usize;
        for handle in self.snapshot() {
            if self.connections.remove(&handle.id).is_some() {
                handle.mark_closed();
                self.metrics.connection_closed();
                closed += 1;
            }
        }

        info!(count = closed, "All dashboard connections closed");
        closed
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections
            .get(conn_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a connection is registered.
    pub fn contains(&self, conn_id: &ConnectionId) -> bool {
        self.connections.contains_key(conn_id)
    }

    /// Returns the number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Serializable view of every registered connection.
    pub fn connections(&self) -> Vec<ConnectionInfo> {
        self.snapshot().iter().map(|h| h.info()).collect()
    }

    fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}
