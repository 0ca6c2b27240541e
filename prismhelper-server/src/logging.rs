//! Tracing subscriber setup.
//!
//! Layers, each with its own filter:
//! - console, at `LOGLEVEL_CONSOLE` (`RUST_LOG` wins, `-v` raises to debug)
//! - the log file, at `LOGLEVEL_FILE`
//! - the error log file, errors only
//! - external shipping, when enabled
//! - error shipping, when `SEND_ERRORS` is on

use anyhow::{Context, Result};
use prismhelper_config::{AppConfig, LogLevel};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::external_log::{Identity, ShippingLayer};

/// Installs the global subscriber.
pub fn init(config: &AppConfig, verbose: bool) -> Result<()> {
    let logging = &config.logging;

    let console = fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(console_filter(logging.console_level, verbose));

    let file = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(open_log(&logging.file)?))
        .with_filter(LevelFilter::from_level(logging.file_level.to_tracing()));

    let error_file = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(open_log(&logging.error_file)?))
        .with_filter(LevelFilter::ERROR);

    let external = &logging.external;
    let shipping = match external.depth.max_level() {
        Some(level) if external.enabled => {
            let identity = Arc::new(identity(config));
            let layer = ShippingLayer::spawn(&external.target, identity, external.depth.outcomes_only())
                .context("Failed to start external log shipping")?;
            Some(layer.with_filter(LevelFilter::from_level(level)))
        }
        _ => None,
    };

    let error_shipping = match &logging.error_shipping {
        Some(target) => {
            let identity = Arc::new(identity(config));
            let layer = ShippingLayer::spawn(target, identity, false)
                .context("Failed to start error shipping")?;
            Some(layer.with_filter(LevelFilter::ERROR))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(error_file)
        .with(shipping)
        .with(error_shipping)
        .try_init()
        .context("Failed to install log subscriber")?;

    if external.enabled {
        tracing::info!("External logging enabled: {}", external.target.url);
    }

    Ok(())
}

fn console_filter(level: LogLevel, verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut level = LevelFilter::from_level(level.to_tracing());
    if verbose {
        level = level.max(LevelFilter::DEBUG);
    }
    EnvFilter::default().add_directive(level.into())
}

/// Identity attached to shipped records. `EXTERNAL_LOG_OPTIONS` and
/// `EXTERNAL_LOG_ANONYMISE` apply to both shippers.
fn identity(config: &AppConfig) -> Identity {
    let external = &config.logging.external;
    let identifier = std::env::var("HOSTNAME").unwrap_or_else(|_| "prismhelper".to_string());
    let environment = if config.remote.container_mode {
        "container"
    } else {
        "native"
    };
    let options = external.send_options.then(|| config.options_summary());
    Identity::new(identifier, environment, options, external.anonymised)
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        AppConfig::from_vars(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .unwrap()
            .config
    }

    #[test]
    fn test_identity_omits_options_when_disabled() {
        let config = config(&[("SEND_ERRORS", "true"), ("EXTERNAL_LOG_OPTIONS", "false")]);
        assert!(config.logging.error_shipping.is_some());
        assert_eq!(identity(&config).options, None);
    }

    #[test]
    fn test_identity_shares_options_by_default() {
        let config = config(&[("SEND_ERRORS", "true")]);
        assert_eq!(identity(&config).options, Some(config.options_summary()));
    }

    #[test]
    fn test_identity_anonymised() {
        let config = config(&[("EXTERNAL_LOG_ANONYMISE", "true")]);
        let identity = identity(&config);
        assert_eq!(identity.identifier, Identity::ANONYMISED);
        assert_eq!(identity.environment, Identity::ANONYMISED);
    }

    #[test]
    fn test_open_log_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/local.log");

        open_log(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_open_log_appends() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.log");

        writeln!(open_log(&path).unwrap(), "first").unwrap();
        writeln!(open_log(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
