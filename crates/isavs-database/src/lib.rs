//! # isavs-database
//!
//! PostgreSQL connection pool management. The pool is opened before the
//! HTTP listener starts accepting traffic and closed after it stops.

pub mod connection;

pub use connection::DatabasePool;
