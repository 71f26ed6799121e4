//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "ISAVS";

/// Full service title reported at `/`.
pub const SERVICE_TITLE: &str = "ISAVS - Intelligent Student Attendance Verification System";

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
    /// Service name.
    pub service: String,
}

/// Body of `GET /health/detailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `healthy` or `degraded`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
    /// `connected` or `unavailable`.
    pub database: String,
    /// Open dashboard connections.
    pub ws_connections: usize,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    /// Service title.
    pub service: String,
    /// API version.
    pub version: String,
    /// API docs path.
    pub docs: String,
    /// Health check path.
    pub health: String,
}
