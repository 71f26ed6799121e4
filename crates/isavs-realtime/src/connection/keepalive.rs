//! Client-driven `ping`/`pong` keep-alive.
//!
//! This is a liveness probe, not a command channel: the exact text `ping`
//! gets the exact text `pong` back and every other payload is ignored.

/// Probe sent by dashboards.
pub const PING: &str = "ping";

/// Reply to [`PING`].
pub const PONG: &str = "pong";

/// Returns the reply for an inbound text frame, if any.
pub fn reply_to(text: &str) -> Option<&'static str> {
    (text == PING).then_some(PONG)
}
