// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `PrismHelper` Config
//!
//! Environment-sourced configuration for the `PrismHelper` relay.
//!
//! Configuration is assembled once at startup into an [`AppConfig`] and then
//! passed by reference to every component. Problems that have a sensible
//! fallback (bad cron expression, unknown timezone, unparseable number) are
//! reported as warnings on the [`LoadedConfig`] instead of failing startup.
//!
//! ## Usage
//!
//! ```ignore
//! use prismhelper_config::AppConfig;
//!
//! prismhelper_config::load_dotenv(None)?;
//! let loaded = AppConfig::from_env()?;
//! for warning in &loaded.warnings {
//!     tracing::warn!("{warning}");
//! }
//! let config = loaded.config;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod parse;

pub use config::{
    load_dotenv, AppConfig, ImportOptions, IndexOptions, LoadedConfig, RateLimitConfig,
    RemoteConfig, ScheduleOptions, ServerConfig, DEFAULT_API_KEY, DEFAULT_CONTAINER_BROWSER,
    DEFAULT_SITE_URL,
};
pub use error::ConfigError;
pub use logging::{ExternalLogConfig, LogDepth, LogLevel, LoggingConfig, ShipTarget};
pub use parse::{clean_url, is_url, parse_bool, parse_bool_value};
