//! # isavs-core
//!
//! Core crate for the ISAVS backend. Contains the configuration schema and
//! loader plus the unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other ISAVS crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
