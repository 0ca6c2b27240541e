//! Logging configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::Level;
use url::Url;

// ============================================================================
// Log Level
// ============================================================================

/// Severity threshold for a local log sink.
///
/// Accepts the level names of the previous logging setup (`http`, `verbose`,
/// `silly`) alongside the usual ones and maps them onto `tracing` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages.
    Info,
    /// Request-level messages.
    Http,
    /// Verbose diagnostics.
    Verbose,
    /// Debug messages.
    Debug,
    /// Everything.
    Silly,
    /// Everything, tracing spelling.
    Trace,
}

impl LogLevel {
    /// Parses a level name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "http" => Some(Self::Http),
            "verbose" => Some(Self::Verbose),
            "debug" => Some(Self::Debug),
            "silly" => Some(Self::Silly),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Http => "http",
            Self::Verbose => "verbose",
            Self::Debug => "debug",
            Self::Silly => "silly",
            Self::Trace => "trace",
        }
    }

    /// Returns the equivalent `tracing` level.
    pub fn to_tracing(&self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Http | Self::Verbose | Self::Debug => Level::DEBUG,
            Self::Silly | Self::Trace => Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Depth
// ============================================================================

/// How much is shipped to the external log collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDepth {
    /// Every event.
    All,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Info and above.
    Info,
    /// Operation outcomes only.
    Stats,
    /// Nothing.
    None,
}

impl LogDepth {
    /// Parses a depth name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "stats" => Some(Self::Stats),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Returns the depth name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Stats => "stats",
            Self::None => "none",
        }
    }

    /// Least severe level that is shipped, or `None` when nothing is.
    pub fn max_level(&self) -> Option<Level> {
        match self {
            Self::All => Some(Level::TRACE),
            Self::Error => Some(Level::ERROR),
            Self::Warn => Some(Level::WARN),
            Self::Info | Self::Stats => Some(Level::INFO),
            Self::None => None,
        }
    }

    /// Whether only operation outcome events are shipped.
    pub fn outcomes_only(&self) -> bool {
        matches!(self, Self::Stats)
    }
}

impl fmt::Display for LogDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Ship Target
// ============================================================================

/// Remote collector endpoint and its bearer key.
#[derive(Clone, PartialEq, Eq)]
pub struct ShipTarget {
    /// Collector URL.
    pub url: Url,
    /// Bearer key sent with every record.
    pub key: String,
}

impl fmt::Debug for ShipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShipTarget")
            .field("url", &self.url.as_str())
            .field("key", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Logging Config
// ============================================================================

/// External log shipping settings.
#[derive(Debug, Clone)]
pub struct ExternalLogConfig {
    /// Whether shipping is enabled.
    pub enabled: bool,
    /// What gets shipped.
    pub depth: LogDepth,
    /// Where records go.
    pub target: ShipTarget,
    /// Replace identifying fields with `anonymised`.
    pub anonymised: bool,
    /// Attach the options summary to each record.
    pub send_options: bool,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Console threshold.
    pub console_level: LogLevel,
    /// File log threshold.
    pub file_level: LogLevel,
    /// File log path.
    pub file: PathBuf,
    /// Error-only log path.
    pub error_file: PathBuf,
    /// Error shipping target, when `SEND_ERRORS` is on.
    pub error_shipping: Option<ShipTarget>,
    /// General log shipping.
    pub external: ExternalLogConfig,
}
