//! Custom Axum extractors.

pub mod publisher;

pub use publisher::PublisherAuth;
