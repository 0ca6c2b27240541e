//! Serve command - HTTP relay plus scheduled jobs.

use anyhow::Result;
use prismhelper_config::AppConfig;
use tokio::sync::broadcast;
use tracing::{info, warn};

use super::build_operations;
use crate::http::HttpServer;
use crate::scheduler::Scheduler;
use crate::ExitCode;

/// Runs the relay until Ctrl-C.
pub async fn run(config: AppConfig) -> Result<ExitCode> {
    let operations = build_operations(&config)?;
    info!("Targeting PhotoPrism instance at {}", config.remote.site_url);
    info!("Library operations use the {} executor", operations.mode());

    let (shutdown_tx, _) = broadcast::channel(1);

    let scheduler = Scheduler::from_config(&config, operations.clone())?;
    if scheduler.job_count() == 0 {
        info!("No scheduled jobs enabled");
    }
    let jobs = scheduler.spawn(&shutdown_tx);

    let server = HttpServer::new(config.server, operations);
    let server_shutdown = shutdown_tx.subscribe();

    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        info!("Shutdown requested");
        let _ = signal_tx.send(());
    });

    let result = server.run(server_shutdown).await;

    let _ = shutdown_tx.send(());
    for job in jobs {
        let _ = job.await;
    }

    result.map(|()| ExitCode::Success)
}
