//! CLI command implementations.

pub mod config;
pub mod run;
pub mod serve;

use anyhow::{Context, Result};
use prismhelper_config::AppConfig;
use prismhelper_remote::{
    executor_for, BrowserSettings, ChromiumLauncher, HttpClient, ImportPlan, IndexPlan,
    OperationPlan, Operations, RemoteContext,
};
use std::sync::Arc;

/// Builds the operation facade described by `config`.
pub fn build_operations(config: &AppConfig) -> Result<Arc<Operations>> {
    let remote = &config.remote;

    let http = HttpClient::new(remote.api_base()?).context("Failed to create HTTP client")?;
    let launcher = ChromiumLauncher::new(
        BrowserSettings::default().with_executable(remote.browser_executable()),
    );
    let ctx = RemoteContext::builder(remote.site_url.clone(), remote.credentials.clone())
        .session_timeout(remote.session_timeout)
        .http(Arc::new(http))
        .browser(Arc::new(launcher))
        .build()
        .context("Failed to set up the PhotoPrism client")?;

    let plan = OperationPlan {
        import: ImportPlan {
            move_files: config.import.move_files,
            timeout: config.import.timeout,
        },
        index: IndexPlan {
            rescan: config.index.rescan,
            skip_archived: config.index.skip_archived,
            timeout: config.index.timeout,
        },
    };

    Ok(Arc::new(Operations::new(
        Arc::new(ctx),
        executor_for(remote.mode),
        plan,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prismhelper_core::ExecutionMode;

    #[test]
    fn test_operations_follow_action_mode() {
        let loaded = AppConfig::from_vars([("ACTION_MODE", "browser")]).unwrap();
        let operations = build_operations(&loaded.config).unwrap();
        assert_eq!(operations.mode(), ExecutionMode::Browser);

        let loaded = AppConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        let operations = build_operations(&loaded.config).unwrap();
        assert_eq!(operations.mode(), ExecutionMode::Api);
    }

    #[test]
    fn test_site_url_reaches_context() {
        let loaded =
            AppConfig::from_vars([("PHOTOPRISM_SITE_URL", "https://photos.example.com/pp")]).unwrap();
        let operations = build_operations(&loaded.config).unwrap();
        assert_eq!(
            operations.context().http.api_base().as_str(),
            "https://photos.example.com/pp/api/v1/"
        );
    }
}
