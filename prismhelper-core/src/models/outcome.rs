//! The outcome of a remote library operation.
//!
//! Every execution path (successful action, rejected credentials, remote
//! error, transport failure, UI timeout) ends in exactly one [`Outcome`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message reported when the remote server rejects our credentials.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials provided";

/// Message reported when a remote call fails below the HTTP layer.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Message reported when the browser fallback fails for an unclassified reason.
pub const UNKNOWN_INTERNAL_ERROR_MESSAGE: &str = "An unknown internal error occurred.";

/// Message reported when the success toast carried no text.
pub const SUCCESS_MESSAGE_NOT_FOUND: &str = "Success message not found in the timeout time.";

// ============================================================================
// Outcome
// ============================================================================

/// Uniform `{code, message}` result of a library operation.
///
/// `code` is always a valid HTTP status: 2xx on success, 401 when the remote
/// credentials were rejected, 500 for transport or timeout failures, or
/// whatever status the remote server itself answered with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// HTTP-style status code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl Outcome {
    /// Creates an outcome with an arbitrary status.
    ///
    /// Codes outside the HTTP status range collapse to 500.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        let code = if (100..=599).contains(&code) { code } else { 500 };
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a 200 outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(200, message)
    }

    /// The remote server refused our credentials.
    pub fn invalid_credentials() -> Self {
        Self::new(401, INVALID_CREDENTIALS_MESSAGE)
    }

    /// A transport-level failure with no usable HTTP response.
    pub fn unknown_error() -> Self {
        Self::new(500, UNKNOWN_ERROR_MESSAGE)
    }

    /// An unclassified failure inside the browser fallback.
    pub fn internal_error() -> Self {
        Self::new(500, UNKNOWN_INTERNAL_ERROR_MESSAGE)
    }

    /// A 500 outcome carrying diagnostic text.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }

    /// Returns true for 2xx codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_constructors() {
        assert_eq!(Outcome::invalid_credentials().code, 401);
        assert_eq!(Outcome::unknown_error().message, "Unknown error");
        assert_eq!(Outcome::internal_error().code, 500);
        assert_eq!(Outcome::ok("done").code, 200);
    }

    #[test]
    fn test_out_of_range_code_collapses() {
        assert_eq!(Outcome::new(42, "weird").code, 500);
        assert_eq!(Outcome::new(1000, "weird").code, 500);
        assert_eq!(Outcome::new(418, "teapot").code, 418);
    }

    #[test]
    fn test_is_success() {
        assert!(Outcome::new(204, "").is_success());
        assert!(!Outcome::invalid_credentials().is_success());
        assert!(!Outcome::new(302, "moved").is_success());
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::ok("Import done").to_string(), "[200] Import done");
    }
}
