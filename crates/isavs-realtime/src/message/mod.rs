//! Server-to-dashboard message definitions.

pub mod types;

pub use types::{DashboardEvent, EventType};
