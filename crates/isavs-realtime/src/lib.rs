//! # isavs-realtime
//!
//! Real-time fan-out for ISAVS dashboards. Provides:
//!
//! - A connection registry tracking open `/ws/dashboard` sessions
//! - Best-effort broadcast of attendance and anomaly events
//! - The `ping`/`pong` keep-alive protocol
//! - Connection and delivery metrics

pub mod connection;
pub mod message;
pub mod metrics;
pub mod publisher;
pub mod server;

pub use connection::registry::{BroadcastReport, ConnectionRegistry};
pub use message::types::{DashboardEvent, EventType};
pub use publisher::EventPublisher;
pub use server::RealtimeEngine;
