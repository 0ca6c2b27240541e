//! Application configuration assembled from environment variables.

use chrono_tz::Tz;
use prismhelper_core::{Credentials, ExecutionMode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::logging::{ExternalLogConfig, LogDepth, LogLevel, LoggingConfig, ShipTarget};
use crate::parse::{clean_url, parse_bool};

/// Remote server used when `PHOTOPRISM_SITE_URL` is unset or invalid.
pub const DEFAULT_SITE_URL: &str = "http://localhost:2342/";

/// Placeholder API key; a warning is raised while it is in use.
pub const DEFAULT_API_KEY: &str = "testkey";

/// Chromium binary inside the published container image.
pub const DEFAULT_CONTAINER_BROWSER: &str = "/usr/bin/chromium-browser";

const DEFAULT_PORT: u16 = 2343;
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_TIMEZONE: &str = "Australia/Melbourne";
const DEFAULT_SESSION_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ACTION_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_IMPORT_CRON: &str = "0 0 4 * * * *";
const DEFAULT_INDEX_CRON: &str = "0 0 6 * * * *";
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 10 * 60 * 1000;
const DEFAULT_LOG_FILE: &str = "logs/local.log";
const DEFAULT_ERROR_LOG_FILE: &str = "logs/error.log";
const DEFAULT_ERROR_LOG_URL: &str = "http://localhost:2344/errorlog";
const DEFAULT_ERROR_LOG_KEY: &str = "abc123";
const DEFAULT_EXTERNAL_LOG_URL: &str = "http://localhost:2344/";
const DEFAULT_EXTERNAL_LOG_KEY: &str = "testkey";

// ============================================================================
// Config Sections
// ============================================================================

/// Local HTTP server settings.
#[derive(Clone)]
pub struct ServerConfig {
    /// Listen port.
    pub port: u16,
    /// Bearer key callers must present.
    pub api_key: String,
    /// Request rate limit.
    pub rate_limit: RateLimitConfig,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Fixed-window request limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

/// Remote PhotoPrism server settings.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Site base URL, always ending in `/`.
    pub site_url: Url,
    /// Login credentials.
    pub credentials: Credentials,
    /// Which executor performs library operations.
    pub mode: ExecutionMode,
    /// Running inside the container image.
    pub container_mode: bool,
    /// Explicit browser binary.
    pub browser_path: Option<PathBuf>,
    /// Timeout for the session call.
    pub session_timeout: Duration,
}

impl RemoteConfig {
    /// Base URL of the REST API.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        Ok(self.site_url.join("api/v1/")?)
    }

    /// Browser binary to launch, if one is pinned.
    ///
    /// An explicit `BROWSER_PATH` wins; container mode falls back to the
    /// image's Chromium. Otherwise the browser is auto-detected.
    pub fn browser_executable(&self) -> Option<PathBuf> {
        self.browser_path.clone().or_else(|| {
            self.container_mode
                .then(|| PathBuf::from(DEFAULT_CONTAINER_BROWSER))
        })
    }
}

/// Cron trigger for a library operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Whether the job runs.
    pub enabled: bool,
    /// Cron expression, seconds first.
    pub cron: String,
}

/// Import operation settings.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Action timeout.
    pub timeout: Duration,
    /// Move files out of the import folder instead of copying.
    pub move_files: bool,
    /// Automatic import schedule.
    pub schedule: ScheduleOptions,
    /// Run an index after each scheduled import.
    pub index_after: bool,
}

/// Index operation settings.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Action timeout.
    pub timeout: Duration,
    /// Re-index all originals, not only changed ones.
    pub rescan: bool,
    /// Skip archived photos.
    pub skip_archived: bool,
    /// Automatic index schedule.
    pub schedule: ScheduleOptions,
}

// ============================================================================
// App Config
// ============================================================================

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Local HTTP server.
    pub server: ServerConfig,
    /// Remote PhotoPrism server.
    pub remote: RemoteConfig,
    /// Import settings.
    pub import: ImportOptions,
    /// Index settings.
    pub index: IndexOptions,
    /// Timezone for schedules.
    pub timezone: Tz,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Configuration plus the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The configuration.
    pub config: AppConfig,
    /// Non-fatal problems, to be logged once logging is up.
    pub warnings: Vec<String>,
}

impl AppConfig {
    /// Builds configuration from the process environment.
    pub fn from_env() -> Result<LoadedConfig, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Builds configuration from key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Result<LoadedConfig, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = EnvReader::new(vars);

        let site_url = Url::parse(&clean_url(
            &env.string("PHOTOPRISM_SITE_URL", DEFAULT_SITE_URL),
            DEFAULT_SITE_URL,
        ))?;

        let api_key = env.string("APIKEY", DEFAULT_API_KEY);
        if api_key == DEFAULT_API_KEY {
            env.warn(format!(
                "API key should be generated and set. Using default key: {DEFAULT_API_KEY}"
            ));
        }

        let container_mode = env.flag("ISDOCKER");
        if container_mode {
            env.warn(
                "Env var ISDOCKER is set to true. If the application is not running in a \
                 docker container change this to false."
                    .to_string(),
            );
        }

        let mode = match env.get("ACTION_MODE") {
            None => ExecutionMode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                env.warn(format!("Unknown ACTION_MODE '{raw}', using api"));
                ExecutionMode::Api
            }),
        };

        let server = ServerConfig {
            port: env.number("HOSTPORT", DEFAULT_PORT),
            api_key,
            rate_limit: RateLimitConfig {
                max_requests: env.number("RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX),
                window: env.millis("RATE_LIMIT_WINDOW", DEFAULT_RATE_LIMIT_WINDOW_MS),
            },
        };

        let remote = RemoteConfig {
            site_url,
            credentials: Credentials::new(
                env.string("PHOTOPRISM_USERNAME", DEFAULT_USERNAME),
                env.string("PHOTOPRISM_PASSWORD", ""),
            ),
            mode,
            container_mode,
            browser_path: env.get("BROWSER_PATH").map(PathBuf::from),
            session_timeout: env.millis("SESSION_TIMEOUT", DEFAULT_SESSION_TIMEOUT_MS),
        };

        let import = ImportOptions {
            timeout: env.millis("IMPORT_TIMEOUT", DEFAULT_ACTION_TIMEOUT_MS),
            move_files: env.flag("MOVE_ON_IMPORT"),
            schedule: env.schedule("AUTO_IMPORT", "AUTO_IMPORT_CRON", DEFAULT_IMPORT_CRON, "import"),
            index_after: env.flag("INDEX_AFTER_AUTO_IMPORT"),
        };

        let index = IndexOptions {
            timeout: env.millis("INDEX_TIMEOUT", DEFAULT_ACTION_TIMEOUT_MS),
            rescan: env.flag("INDEX_RESCAN"),
            skip_archived: env.flag("INDEX_SKIP_ARCHIVED"),
            schedule: env.schedule("AUTO_INDEX", "AUTO_INDEX_CRON", DEFAULT_INDEX_CRON, "index"),
        };

        let timezone_name = env.string("TIMEZONE", DEFAULT_TIMEZONE);
        let timezone = Tz::from_str(&timezone_name).unwrap_or_else(|_| {
            env.warn(format!("Timezone is not valid: {timezone_name}"));
            Tz::Australia__Melbourne
        });

        let logging = env.logging()?;

        let config = AppConfig {
            server,
            remote,
            import,
            index,
            timezone,
            logging,
        };

        Ok(LoadedConfig {
            config,
            warnings: env.warnings,
        })
    }

    /// Non-sensitive snapshot of the options, safe to attach to shipped logs.
    ///
    /// Never contains credentials, API keys or collector keys.
    pub fn options_summary(&self) -> Value {
        json!({
            "timezone": self.timezone.name(),
            "mode": self.remote.mode,
            "containerMode": self.remote.container_mode,
            "sessionTimeoutMs": duration_ms(self.remote.session_timeout),
            "importOptions": {
                "timeoutMs": duration_ms(self.import.timeout),
                "move": self.import.move_files,
                "autoImport": self.import.schedule.enabled,
                "autoImportCron": self.import.schedule.cron,
                "indexAfterAutoImport": self.import.index_after,
            },
            "indexOptions": {
                "timeoutMs": duration_ms(self.index.timeout),
                "rescan": self.index.rescan,
                "skipArchived": self.index.skip_archived,
                "autoIndex": self.index.schedule.enabled,
                "autoIndexCron": self.index.schedule.cron,
            },
            "logging": {
                "console": self.logging.console_level,
                "file": self.logging.file_level,
                "externalLog": self.logging.external.enabled,
                "externalLogDepth": self.logging.external.depth,
                "sendErrors": self.logging.error_shipping.is_some(),
            },
        })
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Loads a `.env` file into the process environment.
///
/// With an explicit path the file must exist. Without one, `.env` in the
/// working directory is loaded when present.
pub fn load_dotenv(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            debug!(path = %path.display(), "Loaded env file");
            Ok(())
        }
        None => match dotenvy::dotenv() {
            Ok(path) => {
                debug!(path = %path.display(), "Loaded env file");
                Ok(())
            }
            Err(e) if e.not_found() => Ok(()),
            Err(e) => Err(e.into()),
        },
    }
}

// ============================================================================
// Env Reader
// ============================================================================

/// Reads typed values out of a variable map, collecting warnings.
///
/// Empty values count as unset.
struct EnvReader {
    vars: HashMap<String, String>,
    warnings: Vec<String>,
}

impl EnvReader {
    fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self {
            vars,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &str) -> bool {
        self.vars.get(key).is_some_and(|v| parse_bool(v))
    }

    fn number<T: FromStr + fmt::Display + Copy>(&mut self, key: &str, default: T) -> T {
        match self.get(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                self.warn(format!("{key} is not a valid number: {raw}, using {default}"));
                default
            }),
        }
    }

    fn millis(&mut self, key: &str, default_ms: u64) -> Duration {
        Duration::from_millis(self.number(key, default_ms))
    }

    fn schedule(
        &mut self,
        enabled_key: &str,
        cron_key: &str,
        default_cron: &str,
        label: &str,
    ) -> ScheduleOptions {
        let cron = self.string(cron_key, default_cron);
        let mut enabled = self.flag(enabled_key);
        if enabled && cron::Schedule::from_str(&cron).is_err() {
            self.warn(format!(
                "Invalid auto {label} cron set, disabling auto {label}."
            ));
            enabled = false;
        }
        ScheduleOptions { enabled, cron }
    }

    fn level(&mut self, key: &str, default: LogLevel, label: &str) -> LogLevel {
        match self.get(key) {
            None => default,
            Some(raw) => LogLevel::parse(&raw).unwrap_or_else(|| {
                self.warn(format!(
                    "Invalid {label} logging level provided, defaulting to error"
                ));
                LogLevel::Error
            }),
        }
    }

    fn url(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        Ok(Url::parse(&clean_url(&self.string(key, default), default))?)
    }

    fn logging(&mut self) -> Result<LoggingConfig, ConfigError> {
        let console_level = self.level("LOGLEVEL_CONSOLE", LogLevel::Info, "console");
        let file_level = self.level("LOGLEVEL_FILE", LogLevel::Error, "file");

        let error_shipping = if self.flag("SEND_ERRORS") {
            Some(ShipTarget {
                url: self.url("ERROR_LOG_URL", DEFAULT_ERROR_LOG_URL)?,
                key: self.string("ERROR_LOG_KEY", DEFAULT_ERROR_LOG_KEY),
            })
        } else {
            None
        };

        let depth = match self.get("EXTERNAL_LOG_DEPTH") {
            None => LogDepth::Info,
            Some(raw) => LogDepth::parse(&raw).unwrap_or_else(|| {
                self.warn(
                    "Invalid depth provided for external log, defaulting to none".to_string(),
                );
                LogDepth::None
            }),
        };

        let external = ExternalLogConfig {
            enabled: self.flag("EXTERNAL_LOG"),
            depth,
            target: ShipTarget {
                url: self.url("EXTERNAL_LOG_URL", DEFAULT_EXTERNAL_LOG_URL)?,
                key: self.string("EXTERNAL_LOG_KEY", DEFAULT_EXTERNAL_LOG_KEY),
            },
            anonymised: self.flag("EXTERNAL_LOG_ANONYMISE"),
            send_options: self.get("EXTERNAL_LOG_OPTIONS").is_none_or(|v| parse_bool(&v)),
        };

        Ok(LoggingConfig {
            console_level,
            file_level,
            file: PathBuf::from(self.string("LOGFILE", DEFAULT_LOG_FILE)),
            error_file: PathBuf::from(DEFAULT_ERROR_LOG_FILE),
            error_shipping,
            external,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> LoadedConfig {
        AppConfig::from_vars(vars.iter().map(|(k, v)| (k.to_string(), v.to_string()))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let loaded = load(&[]);
        let config = &loaded.config;

        assert_eq!(config.remote.site_url.as_str(), DEFAULT_SITE_URL);
        assert_eq!(config.server.port, 2343);
        assert_eq!(config.remote.credentials.username, "admin");
        assert_eq!(config.remote.credentials.password, "");
        assert_eq!(config.remote.mode, ExecutionMode::Api);
        assert_eq!(config.remote.session_timeout, Duration::from_secs(10));
        assert_eq!(config.import.timeout, Duration::from_secs(30));
        assert!(!config.import.move_files);
        assert!(!config.import.schedule.enabled);
        assert_eq!(config.import.schedule.cron, "0 0 4 * * * *");
        assert_eq!(config.index.schedule.cron, "0 0 6 * * * *");
        assert_eq!(config.timezone, Tz::Australia__Melbourne);
        assert_eq!(config.server.rate_limit.max_requests, 100);
        assert_eq!(config.server.rate_limit.window, Duration::from_secs(600));
        assert_eq!(config.logging.console_level, LogLevel::Info);
        assert_eq!(config.logging.file_level, LogLevel::Error);
        assert!(config.logging.error_shipping.is_none());
        assert!(config.logging.external.send_options);

        // Default API key is always flagged.
        assert!(loaded.warnings.iter().any(|w| w.contains("API key")));
    }

    #[test]
    fn test_overrides() {
        let loaded = load(&[
            ("PHOTOPRISM_SITE_URL", "https://photos.example.com"),
            ("HOSTPORT", "8080"),
            ("APIKEY", "s3cret"),
            ("PHOTOPRISM_USERNAME", "bob"),
            ("PHOTOPRISM_PASSWORD", "pw"),
            ("IMPORT_TIMEOUT", "120000"),
            ("MOVE_ON_IMPORT", "yes"),
            ("INDEX_RESCAN", "1"),
            ("INDEX_SKIP_ARCHIVED", "true"),
            ("ACTION_MODE", "browser"),
            ("TIMEZONE", "Europe/Berlin"),
        ]);
        let config = &loaded.config;

        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
        assert_eq!(config.remote.site_url.as_str(), "https://photos.example.com/");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.api_key, "s3cret");
        assert_eq!(config.remote.credentials, Credentials::new("bob", "pw"));
        assert_eq!(config.import.timeout, Duration::from_secs(120));
        assert!(config.import.move_files);
        assert!(config.index.rescan);
        assert!(config.index.skip_archived);
        assert_eq!(config.remote.mode, ExecutionMode::Browser);
        assert_eq!(config.timezone, Tz::Europe__Berlin);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let loaded = load(&[("HOSTPORT", ""), ("PHOTOPRISM_USERNAME", "")]);
        assert_eq!(loaded.config.server.port, 2343);
        assert_eq!(loaded.config.remote.credentials.username, "admin");
    }

    #[test]
    fn test_invalid_site_url_falls_back() {
        let loaded = load(&[("PHOTOPRISM_SITE_URL", "not-a-url")]);
        assert_eq!(loaded.config.remote.site_url.as_str(), DEFAULT_SITE_URL);
    }

    #[test]
    fn test_api_base() {
        let loaded = load(&[("PHOTOPRISM_SITE_URL", "http://nas:2342/prism")]);
        let base = loaded.config.remote.api_base().unwrap();
        assert_eq!(base.as_str(), "http://nas:2342/prism/api/v1/");
    }

    #[test]
    fn test_invalid_cron_disables_schedule() {
        let loaded = load(&[("AUTO_IMPORT", "true"), ("AUTO_IMPORT_CRON", "every day")]);
        assert!(!loaded.config.import.schedule.enabled);
        assert!(loaded
            .warnings
            .iter()
            .any(|w| w == "Invalid auto import cron set, disabling auto import."));
    }

    #[test]
    fn test_valid_cron_enables_schedule() {
        let loaded = load(&[("AUTO_INDEX", "y"), ("AUTO_INDEX_CRON", "0 30 2 * * *")]);
        assert!(loaded.config.index.schedule.enabled);
        assert_eq!(loaded.config.index.schedule.cron, "0 30 2 * * *");
    }

    #[test]
    fn test_invalid_timezone_warns() {
        let loaded = load(&[("TIMEZONE", "Melbourne/Australia")]);
        assert_eq!(loaded.config.timezone, Tz::Australia__Melbourne);
        assert!(loaded
            .warnings
            .iter()
            .any(|w| w == "Timezone is not valid: Melbourne/Australia"));
    }

    #[test]
    fn test_bad_number_warns_and_defaults() {
        let loaded = load(&[("HOSTPORT", "eighty")]);
        assert_eq!(loaded.config.server.port, 2343);
        assert!(loaded.warnings.iter().any(|w| w.starts_with("HOSTPORT")));
    }

    #[test]
    fn test_unknown_action_mode_warns() {
        let loaded = load(&[("ACTION_MODE", "carrier-pigeon")]);
        assert_eq!(loaded.config.remote.mode, ExecutionMode::Api);
        assert!(loaded.warnings.iter().any(|w| w.contains("ACTION_MODE")));
    }

    #[test]
    fn test_browser_executable() {
        let loaded = load(&[]);
        assert_eq!(loaded.config.remote.browser_executable(), None);

        let loaded = load(&[("ISDOCKER", "true")]);
        assert_eq!(
            loaded.config.remote.browser_executable(),
            Some(PathBuf::from(DEFAULT_CONTAINER_BROWSER))
        );
        assert!(loaded.warnings.iter().any(|w| w.contains("ISDOCKER")));

        let loaded = load(&[("ISDOCKER", "true"), ("BROWSER_PATH", "/opt/chrome")]);
        assert_eq!(
            loaded.config.remote.browser_executable(),
            Some(PathBuf::from("/opt/chrome"))
        );
    }

    #[test]
    fn test_logging_settings() {
        let loaded = load(&[
            ("LOGLEVEL_CONSOLE", "verbose"),
            ("LOGLEVEL_FILE", "shouting"),
            ("SEND_ERRORS", "1"),
            ("EXTERNAL_LOG", "true"),
            ("EXTERNAL_LOG_DEPTH", "sideways"),
            ("EXTERNAL_LOG_OPTIONS", "false"),
        ]);
        let logging = &loaded.config.logging;

        assert_eq!(logging.console_level, LogLevel::Verbose);
        assert_eq!(logging.file_level, LogLevel::Error);
        assert_eq!(
            logging.error_shipping.as_ref().unwrap().url.as_str(),
            "http://localhost:2344/errorlog/"
        );
        assert!(logging.external.enabled);
        assert_eq!(logging.external.depth, LogDepth::None);
        assert!(!logging.external.send_options);
        assert!(loaded.warnings.iter().any(|w| w.contains("file logging level")));
        assert!(loaded.warnings.iter().any(|w| w.contains("external log")));
    }

    #[test]
    fn test_options_summary_has_no_secrets() {
        let loaded = load(&[
            ("APIKEY", "api-secret"),
            ("PHOTOPRISM_PASSWORD", "pw-secret"),
            ("EXTERNAL_LOG_KEY", "log-secret"),
        ]);
        let summary = loaded.config.options_summary().to_string();

        assert!(summary.contains("Australia/Melbourne"));
        assert!(!summary.contains("api-secret"));
        assert!(!summary.contains("pw-secret"));
        assert!(!summary.contains("log-secret"));
        assert!(!summary.contains("admin"));
    }

    #[test]
    fn test_load_dotenv_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.env");
        std::fs::write(&path, "PRISMHELPER_DOTENV_PROBE=loaded\n").unwrap();

        load_dotenv(Some(&path)).unwrap();
        assert_eq!(std::env::var("PRISMHELPER_DOTENV_PROBE").unwrap(), "loaded");
    }

    #[test]
    fn test_load_dotenv_missing_explicit_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_dotenv(Some(&dir.path().join("absent.env"))).is_err());
    }
}
