//! Cron-driven imports and index runs.
//!
//! Each enabled job gets its own task: compute the next fire time in the
//! configured timezone, sleep, run. Jobs stop at the next sleep once the
//! shutdown signal fires.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use prismhelper_config::AppConfig;
use prismhelper_core::Operation;
use prismhelper_remote::Operations;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// One scheduled operation.
#[derive(Debug, Clone)]
pub struct Job {
    operation: Operation,
    schedule: Schedule,
    index_after: bool,
}

impl Job {
    /// Creates a job from a cron expression.
    pub fn new(operation: Operation, cron: &str, index_after: bool) -> Result<Self> {
        let schedule = Schedule::from_str(cron)
            .with_context(|| format!("Invalid cron expression for auto {operation}: {cron}"))?;
        Ok(Self {
            operation,
            schedule,
            index_after,
        })
    }
}

/// Scheduled jobs sharing one operation facade.
pub struct Scheduler {
    operations: Arc<Operations>,
    timezone: Tz,
    jobs: Vec<Job>,
}

impl Scheduler {
    /// Builds the jobs enabled in `config`.
    pub fn from_config(config: &AppConfig, operations: Arc<Operations>) -> Result<Self> {
        let mut jobs = Vec::new();

        let import = &config.import;
        if import.schedule.enabled {
            jobs.push(Job::new(Operation::Import, &import.schedule.cron, import.index_after)?);
        }
        let index = &config.index;
        if index.schedule.enabled {
            jobs.push(Job::new(Operation::Index, &index.schedule.cron, false)?);
        }

        Ok(Self {
            operations,
            timezone: config.timezone,
            jobs,
        })
    }

    /// Returns the number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Starts one task per job.
    pub fn spawn(self, shutdown: &broadcast::Sender<()>) -> Vec<JoinHandle<()>> {
        self.jobs
            .into_iter()
            .map(|job| {
                info!(
                    operation = %job.operation,
                    timezone = %self.timezone,
                    "Auto {} scheduled",
                    job.operation
                );
                tokio::spawn(run_job(
                    job,
                    self.operations.clone(),
                    self.timezone,
                    shutdown.subscribe(),
                ))
            })
            .collect()
    }
}

async fn run_job(job: Job, operations: Arc<Operations>, timezone: Tz, mut shutdown: broadcast::Receiver<()>) {
    loop {
        let Some(delay) = next_delay(&job.schedule, timezone, Utc::now()) else {
            warn!(operation = %job.operation, "Schedule has no future fire times");
            return;
        };

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            _ = shutdown.recv() => return,
        }

        let run = async {
            info!("Running auto {}.", job.operation);
            operations.run(job.operation).await;

            if job.index_after {
                info!("Running index after auto import.");
                operations.run_index().await;
            }
        };

        // In-flight operations are abandoned on shutdown.
        tokio::select! {
            () = run => {}
            _ = shutdown.recv() => {
                warn!(operation = %job.operation, "Auto {} interrupted by shutdown", job.operation);
                return;
            }
        }
    }
}

/// Time from `now` until the schedule next fires in `timezone`.
pub fn next_delay(schedule: &Schedule, timezone: Tz, now: DateTime<Utc>) -> Option<Duration> {
    let next = schedule.after(&now.with_timezone(&timezone)).next()?;
    Some(
        next.with_timezone(&Utc)
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(Duration::ZERO),
    )
}
