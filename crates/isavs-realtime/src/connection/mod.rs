//! Dashboard connection management — handles, registry, keep-alive.

pub mod handle;
pub mod keepalive;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId, ConnectionState};
pub use registry::{ConnectionRegistry, Registration};
