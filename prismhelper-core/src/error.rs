//! Core error types for `PrismHelper`.

use thiserror::Error;

/// Core error type for `PrismHelper` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown library operation name.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Unknown execution mode name.
    #[error("Unknown execution mode: {0}")]
    UnknownExecutionMode(String),
}
