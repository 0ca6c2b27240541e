//! Remote error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Remote Error
// ============================================================================

/// Error type for setting up remote access.
///
/// Errors raised while performing an operation never escape as `RemoteError`;
/// executors translate them into an `Outcome` at the call site.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// A URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl HttpError {
    /// Classifies a reqwest error, surfacing timeouts separately.
    pub fn from_request(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Request(err)
        }
    }
}

// ============================================================================
// Browser Error
// ============================================================================

/// Error type for headless browser operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser binary not found.
    #[error("Browser not found: {0}")]
    BrowserNotFound(String),

    /// Browser process could not be started.
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Page navigation failed.
    #[error("Navigation to {url} failed: {reason}")]
    Navigation {
        /// Target URL.
        url: String,
        /// Failure reason.
        reason: String,
    },

    /// A required element is missing from the page.
    #[error("No element matches `{selector}`: {reason}")]
    SelectorNotFound {
        /// CSS selector.
        selector: String,
        /// Failure reason.
        reason: String,
    },

    /// An element did not appear in time.
    #[error("Waiting for selector `{selector}` failed: {}ms exceeded", .waited.as_millis())]
    Timeout {
        /// CSS selector.
        selector: String,
        /// How long we waited.
        waited: Duration,
    },

    /// DevTools protocol failure.
    #[error("DevTools protocol error: {0}")]
    Protocol(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrowserError {
    /// Returns true for the wait-for-selector timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Protocol(err.to_string())
    }
}
