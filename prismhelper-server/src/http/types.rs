//! HTTP request/response types.

use serde::Serialize;

/// Body returned by `/import` and `/index`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Outcome message.
    pub message: String,
}

/// Body returned when a request is refused locally.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Why the request was refused.
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always true while the server answers.
    pub healthy: bool,
    /// Application version.
    pub version: String,
}
