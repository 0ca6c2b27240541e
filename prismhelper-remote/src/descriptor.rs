//! Operation descriptors.
//!
//! An [`ActionDescriptor`] carries everything either executor needs to run
//! one operation: the REST endpoint and body, the web UI page and selectors,
//! and the timeout. Descriptors are rebuilt from the [`OperationPlan`] for
//! every call.

use prismhelper_core::Operation;
use serde_json::{json, Value};
use std::time::Duration;

/// Default timeout for import and index actions.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Toast shown by the web UI when a job finishes.
pub const SUCCESS_TOAST_SELECTOR: &str = "div.v-snack__content";

// ============================================================================
// Bindings
// ============================================================================

/// Direct API binding for an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiBinding {
    /// Endpoint below the API base.
    pub endpoint: &'static str,
    /// JSON request body.
    pub body: Value,
}

/// Web UI binding for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBinding {
    /// Page path below the site URL.
    pub path: &'static str,
    /// Button that starts the job.
    pub action_selector: String,
    /// Element that appears when the job is done.
    pub success_selector: &'static str,
}

impl PageBinding {
    fn for_operation(operation: Operation) -> Self {
        let path = match operation {
            Operation::Import => "library/import",
            Operation::Index => "library",
        };
        Self {
            path,
            action_selector: format!(r#"button[class*="action-{}"]"#, operation.name()),
            success_selector: SUCCESS_TOAST_SELECTOR,
        }
    }
}

/// Everything needed to run one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    /// Which operation.
    pub operation: Operation,
    /// REST binding.
    pub api: ApiBinding,
    /// Web UI binding.
    pub page: PageBinding,
    /// Upper bound for the action call or the toast wait.
    pub timeout: Duration,
}

// ============================================================================
// Operation Plan
// ============================================================================

/// Static import parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportPlan {
    /// Move files out of the import folder instead of copying.
    pub move_files: bool,
    /// Action timeout.
    pub timeout: Duration,
}

impl Default for ImportPlan {
    fn default() -> Self {
        Self {
            move_files: false,
            timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }
}

/// Static index parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexPlan {
    /// Re-index every file, not just changed ones.
    pub rescan: bool,
    /// Skip archived photos.
    pub skip_archived: bool,
    /// Action timeout.
    pub timeout: Duration,
}

impl Default for IndexPlan {
    fn default() -> Self {
        Self {
            rescan: false,
            skip_archived: false,
            timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }
}

/// Parameters for both operations, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationPlan {
    /// Import parameters.
    pub import: ImportPlan,
    /// Index parameters.
    pub index: IndexPlan,
}

impl OperationPlan {
    /// Builds the descriptor for `operation`.
    pub fn descriptor(&self, operation: Operation) -> ActionDescriptor {
        let (body, timeout) = match operation {
            Operation::Import => (
                json!({
                    "path": "/",
                    "move": self.import.move_files,
                }),
                self.import.timeout,
            ),
            Operation::Index => (
                json!({
                    "convert": true,
                    "path": "/",
                    "rescan": self.index.rescan,
                    "skipArchived": self.index.skip_archived,
                }),
                self.index.timeout,
            ),
        };

        ActionDescriptor {
            operation,
            api: ApiBinding {
                endpoint: operation.name(),
                body,
            },
            page: PageBinding::for_operation(operation),
            timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_descriptor() {
        let plan = OperationPlan {
            import: ImportPlan {
                move_files: true,
                timeout: Duration::from_secs(5),
            },
            ..Default::default()
        };
        let d = plan.descriptor(Operation::Import);

        assert_eq!(d.api.endpoint, "import");
        assert_eq!(d.api.body, json!({"path": "/", "move": true}));
        assert_eq!(d.timeout, Duration::from_secs(5));
        assert_eq!(d.page.path, "library/import");
        assert_eq!(d.page.action_selector, r#"button[class*="action-import"]"#);
    }

    #[test]
    fn test_index_descriptor() {
        let plan = OperationPlan {
            index: IndexPlan {
                rescan: true,
                skip_archived: false,
                timeout: Duration::from_secs(60),
            },
            ..Default::default()
        };
        let d = plan.descriptor(Operation::Index);

        assert_eq!(d.api.endpoint, "index");
        assert_eq!(
            d.api.body,
            json!({"convert": true, "path": "/", "rescan": true, "skipArchived": false})
        );
        assert_eq!(d.page.path, "library");
        assert_eq!(d.page.success_selector, SUCCESS_TOAST_SELECTOR);
    }
}
