//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use isavs_core::error::AppError;
use isavs_realtime::{DashboardEvent, EventType};

/// Body of `POST /api/realtime/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishEventRequest {
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Payload; must be a JSON object.
    pub data: serde_json::Value,
    /// Defaults to the time the request is handled.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PublishEventRequest {
    /// Validates the payload and builds the event to broadcast.
    pub fn into_event(self) -> Result<DashboardEvent, AppError> {
        if !self.data.is_object() {
            return Err(AppError::validation("`data` must be a JSON object"));
        }

        let event = DashboardEvent::new(self.event_type, self.data);
        Ok(match self.timestamp {
            Some(ts) => event.with_timestamp(ts),
            None => event,
        })
    }
}
