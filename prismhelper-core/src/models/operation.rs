//! Library operations and how they are executed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Operation
// ============================================================================

/// A library operation on the remote server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Import new files from the import folder.
    Import,
    /// Re-index the originals folder.
    Index,
}

impl Operation {
    /// Returns the operation name as used by endpoints and UI selectors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Index => "index",
        }
    }

    /// Returns all operations.
    pub fn all() -> &'static [Operation] {
        &[Self::Import, Self::Index]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "import" => Ok(Self::Import),
            "index" => Ok(Self::Index),
            other => Err(CoreError::UnknownOperation(other.to_string())),
        }
    }
}

// ============================================================================
// Execution Mode
// ============================================================================

/// Which executor performs library operations in a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Direct authenticated API calls.
    #[default]
    Api,
    /// Headless browser clicking through the web UI.
    Browser,
}

impl ExecutionMode {
    /// Returns the display name for this mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Browser => "Browser",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExecutionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "browser" | "web" | "puppeteer" => Ok(Self::Browser),
            other => Err(CoreError::UnknownExecutionMode(other.to_string())),
        }
    }
}
