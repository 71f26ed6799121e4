//! Dashboard event type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use isavs_core::AppResult;

/// Kind of event pushed to dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A student's attendance record changed.
    AttendanceUpdate,
    /// Verification flagged something suspicious.
    AnomalyAlert,
}

impl EventType {
    /// Wire name of this event type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttendanceUpdate => "attendance_update",
            Self::AnomalyAlert => "anomaly_alert",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message pushed to every connected dashboard.
///
/// Serialized as `{"type": ..., "data": ..., "timestamp": "<RFC 3339>"}`.
/// The shape of `data` is owned by whoever publishes the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardEvent {
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Opaque payload.
    pub data: serde_json::Value,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
}

impl DashboardEvent {
    /// Creates an event stamped with the current time.
    pub fn new(event_type: EventType, data: serde_json::Value) -> Self {
        Self {
            event_type,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Creates an `attendance_update` event.
    pub fn attendance_update(data: serde_json::Value) -> Self {
        Self::new(EventType::AttendanceUpdate, data)
    }

    /// Creates an `anomaly_alert` event.
    pub fn anomaly_alert(data: serde_json::Value) -> Self {
        Self::new(EventType::AnomalyAlert, data)
    }

    /// Overrides the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Serializes the event to its wire form.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
