//! Action executor trait.
//!
//! An executor is one way of getting PhotoPrism to run an operation. There
//! are two: [`ApiActionExecutor`] calls the REST API and
//! [`BrowserActionExecutor`] clicks through the web UI. A deployment picks
//! one at startup through its [`ExecutionMode`].

use async_trait::async_trait;
use prismhelper_core::{ExecutionMode, Outcome};

use crate::api::ApiActionExecutor;
use crate::context::RemoteContext;
use crate::descriptor::ActionDescriptor;
use crate::web::BrowserActionExecutor;

/// Performs one operation against the remote server.
///
/// ## Implementing an Executor
///
/// ```ignore
/// struct DryRunExecutor;
///
/// #[async_trait]
/// impl ActionExecutor for DryRunExecutor {
///     fn id(&self) -> &str {
///         "dry-run"
///     }
///
///     fn mode(&self) -> ExecutionMode {
///         ExecutionMode::Api
///     }
///
///     async fn perform(&self, _ctx: &RemoteContext, d: &ActionDescriptor) -> Outcome {
///         Outcome::ok(format!("would run {}", d.operation))
///     }
/// }
/// ```
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Unique identifier for this executor.
    fn id(&self) -> &str;

    /// The mode this executor implements.
    fn mode(&self) -> ExecutionMode;

    /// Human-readable name for this executor.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.mode().display_name())
    }

    /// Runs the described operation.
    ///
    /// Never fails: every error path is translated into an [`Outcome`].
    async fn perform(&self, ctx: &RemoteContext, descriptor: &ActionDescriptor) -> Outcome;
}

/// Returns the executor for `mode`.
pub fn executor_for(mode: ExecutionMode) -> Box<dyn ActionExecutor> {
    match mode {
        ExecutionMode::Api => Box::new(ApiActionExecutor::new()),
        ExecutionMode::Browser => Box::new(BrowserActionExecutor::new()),
    }
}
