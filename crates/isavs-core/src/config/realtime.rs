//! Real-time WebSocket engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (dashboard WebSocket) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound queue capacity per connection. A connection whose queue is
    /// full when an event is broadcast is treated as stalled and closed.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Upper bound for a single socket write, in milliseconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_ms: u64,
    /// Close connections that send nothing for this many seconds.
    /// `0` disables the check.
    #[serde(default)]
    pub idle_timeout_seconds: u64,
    /// Bearer token required by the `/api/realtime` endpoints. Those
    /// endpoints are not mounted when this is unset or empty.
    #[serde(default)]
    pub publish_token: Option<String>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            send_timeout_ms: default_send_timeout(),
            idle_timeout_seconds: 0,
            publish_token: None,
        }
    }
}

impl RealtimeConfig {
    /// Per-write socket timeout.
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Idle timeout, if enabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_seconds > 0).then(|| Duration::from_secs(self.idle_timeout_seconds))
    }

    /// Configured publish token, ignoring blank values.
    pub fn publish_token(&self) -> Option<&str> {
        self.publish_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn default_channel_buffer() -> usize {
    64
}

fn default_send_timeout() -> u64 {
    5000
}
