//! Config command - show the effective configuration.

use anyhow::Result;
use prismhelper_config::AppConfig;
use serde_json::json;

use crate::ExitCode;

/// Prints the configuration summary and any validation warnings.
///
/// Credentials and keys are never printed.
pub fn run(config: &AppConfig, warnings: &[String]) -> Result<ExitCode> {
    let output = json!({
        "site": config.remote.site_url.as_str(),
        "port": config.server.port,
        "logFile": config.logging.file.display().to_string(),
        "options": config.options_summary(),
        "warnings": warnings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::Success)
}
