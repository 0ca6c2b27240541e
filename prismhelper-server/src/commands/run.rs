//! One-shot commands: import, index and stats.

use anyhow::Result;
use clap::Args;
use prismhelper_config::AppConfig;
use prismhelper_core::Operation;
use prismhelper_remote::StatsFilter;

use super::build_operations;
use crate::ExitCode;

/// Arguments for the stats command.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Field to keep (repeatable). All fields when omitted.
    #[arg(long = "field", short)]
    pub fields: Vec<String>,
}

/// Runs `operation` once and prints the outcome.
pub async fn operation(config: &AppConfig, operation: Operation) -> Result<ExitCode> {
    let operations = build_operations(config)?;
    let outcome = operations.run(operation).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_success() {
        ExitCode::Success
    } else {
        ExitCode::OperationFailed
    })
}

/// Runs the stats query once and prints the body.
pub async fn stats(config: &AppConfig, args: &StatsArgs) -> Result<ExitCode> {
    let operations = build_operations(config)?;
    let stats = operations
        .get_stats(&StatsFilter::new(args.fields.iter().cloned()))
        .await;

    println!("{}", stats.body);

    Ok(if stats.is_success() {
        ExitCode::Success
    } else {
        ExitCode::OperationFailed
    })
}
