//! Operation facade.
//!
//! [`Operations`] is what triggers (HTTP handlers, cron jobs, CLI commands)
//! call. It binds the configured executor to the fixed operation plan and
//! logs every result under [`OUTCOME_LOG_TARGET`].

use prismhelper_core::{ExecutionMode, Operation, Outcome, UNKNOWN_ERROR_MESSAGE};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

use crate::context::RemoteContext;
use crate::descriptor::OperationPlan;
use crate::executor::ActionExecutor;
use crate::session::SessionProvider;
use crate::stats::{StatsFilter, StatsResponse, STATS_ENDPOINT};

/// Tracing target for operation results.
///
/// External log shipping at `stats` depth forwards only events with this target.
pub const OUTCOME_LOG_TARGET: &str = "prismhelper::outcome";

/// Import, index and stats against the remote server.
pub struct Operations {
    ctx: Arc<RemoteContext>,
    executor: Box<dyn ActionExecutor>,
    plan: OperationPlan,
}

impl Operations {
    /// Creates the facade.
    pub fn new(ctx: Arc<RemoteContext>, executor: Box<dyn ActionExecutor>, plan: OperationPlan) -> Self {
        Self {
            ctx,
            executor,
            plan,
        }
    }

    /// Returns the active execution mode.
    pub fn mode(&self) -> ExecutionMode {
        self.executor.mode()
    }

    /// Returns the shared context.
    pub fn context(&self) -> &RemoteContext {
        &self.ctx
    }

    /// Runs `operation` with the active executor.
    #[instrument(skip(self), fields(executor = %self.executor.id()))]
    pub async fn run(&self, operation: Operation) -> Outcome {
        let descriptor = self.plan.descriptor(operation);
        let start = Instant::now();

        let outcome = self.executor.perform(&self.ctx, &descriptor).await;
        log_outcome(operation.name(), &outcome, start.elapsed());
        outcome
    }

    /// Imports new files.
    pub async fn run_import(&self) -> Outcome {
        self.run(Operation::Import).await
    }

    /// Re-indexes the library.
    pub async fn run_index(&self) -> Outcome {
        self.run(Operation::Index).await
    }

    /// Queries library statistics and projects them through `filter`.
    ///
    /// Remote errors are passed through with their status and body.
    #[instrument(skip(self))]
    pub async fn get_stats(&self, filter: &StatsFilter) -> StatsResponse {
        let start = Instant::now();

        let token = match SessionProvider::new(&self.ctx).login().await {
            Ok(token) => token,
            Err(failure) => {
                warn!(%failure, "Authentication failed");
                let outcome = Outcome::invalid_credentials();
                log_outcome("stats", &outcome, start.elapsed());
                return StatsResponse::new(outcome.code, json!({ "message": outcome.message }));
            }
        };

        let response = match self
            .ctx
            .http
            .get_with_session(STATS_ENDPOINT, token, self.ctx.session_timeout())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Stats request failed");
                log_outcome("stats", &Outcome::unknown_error(), start.elapsed());
                return StatsResponse::new(500, json!({ "message": UNKNOWN_ERROR_MESSAGE }));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Stats response unreadable");
                log_outcome("stats", &Outcome::unknown_error(), start.elapsed());
                return StatsResponse::new(500, json!({ "message": UNKNOWN_ERROR_MESSAGE }));
            }
        };

        let stats = match serde_json::from_str::<Value>(&text) {
            Ok(body) if (200..300).contains(&status) => StatsResponse::new(status, filter.apply(body)),
            Ok(body) => StatsResponse::new(status, body),
            Err(_) => StatsResponse::raw(status, content_type, text),
        };

        log_outcome(
            "stats",
            &Outcome::new(status, "Stats retrieved"),
            start.elapsed(),
        );
        stats
    }
}

impl std::fmt::Debug for Operations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operations")
            .field("executor", &self.executor.display_name())
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

fn log_outcome(operation: &str, outcome: &Outcome, elapsed: Duration) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    if outcome.is_success() {
        info!(
            target: OUTCOME_LOG_TARGET,
            operation,
            code = outcome.code,
            elapsed_ms,
            "{}",
            outcome.message
        );
    } else {
        warn!(
            target: OUTCOME_LOG_TARGET,
            operation,
            code = outcome.code,
            elapsed_ms,
            "{}",
            outcome.message
        );
    }
}
