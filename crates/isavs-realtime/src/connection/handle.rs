//! Individual dashboard connection handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Observable lifecycle state. The upgrade handshake happens before a
/// handle exists, so there is no `Connecting` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Registered and accepting broadcasts.
    Open,
    /// Terminal.
    Closed,
}

/// Why a payload could not be queued for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The connection is closed or its writer has gone away.
    #[error("connection closed")]
    Closed,
    /// The outbound queue is full; the client is not keeping up.
    #[error("outbound buffer full")]
    Backpressure,
}

/// A handle to a single dashboard WebSocket connection.
///
/// Holds the sending half of the connection's outbound queue plus the
/// token that tells its socket tasks to shut down. The socket itself is
/// owned by the task that upgraded it.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last inbound activity, unix millis
    last_activity: AtomicI64,
    /// Sender for outbound text frames
    sender: mpsc::Sender<Arc<str>>,
    /// Cleared exactly once when the connection closes
    open: AtomicBool,
    /// Cancelled when the connection closes or the registry shuts down
    closing: CancellationToken,
}

impl ConnectionHandle {
    pub(crate) fn new(sender: mpsc::Sender<Arc<str>>, closing: CancellationToken) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            connected_at: now,
            last_activity: AtomicI64::new(now.timestamp_millis()),
            sender,
            open: AtomicBool::new(true),
            closing,
        }
    }

    /// Queue a payload without waiting.
    pub fn deliver(&self, payload: Arc<str>) -> Result<(), DeliveryError> {
        if !self.is_open() {
            return Err(DeliveryError::Closed);
        }
        match self.sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(DeliveryError::Backpressure),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                Err(DeliveryError::Closed)
            }
        }
    }

    /// Check if the connection is still open
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.closing.is_cancelled()
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        if self.is_open() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    /// Transition to `Closed` and signal the socket tasks.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn mark_closed(&self) -> bool {
        let was_open = self.open.swap(false, Ordering::SeqCst);
        self.closing.cancel();
        was_open
    }

    /// Resolves once the connection has been closed from any side.
    pub async fn closed(&self) {
        self.closing.cancelled().await
    }

    /// Token shared with the connection's writer task.
    pub fn close_token(&self) -> CancellationToken {
        self.closing.clone()
    }

    /// Update last activity timestamp
    pub fn touch(&self) {
        self.last_activity
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Last time the client sent anything
    pub fn last_activity(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_activity.load(Ordering::Relaxed))
            .unwrap_or(self.connected_at)
    }

    /// Get a snapshot of connection info
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            state: self.state(),
            connected_at: self.connected_at,
            last_activity: self.last_activity(),
        }
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Connection ID
    pub id: ConnectionId,
    /// Lifecycle state
    pub state: ConnectionState,
    /// Connected at
    pub connected_at: DateTime<Utc>,
    /// Last inbound activity
    pub last_activity: DateTime<Utc>,
}
