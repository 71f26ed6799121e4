//! # isavs-api
//!
//! HTTP layer for the ISAVS backend built on Axum.
//!
//! Provides the service and health endpoints, the `/ws/dashboard` upgrade,
//! realtime stats and event publishing behind a bearer token, CORS and request logging
//! middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
