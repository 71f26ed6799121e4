//! Route handlers.

pub mod health;
pub mod realtime;
pub mod ws;
