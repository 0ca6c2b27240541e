// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `PrismHelper` Remote
//!
//! Everything that talks to the remote PhotoPrism server.
//!
//! ## Host APIs
//!
//! The [`host`] module wraps the two ways we reach the server:
//!
//! - [`host::http`] - REST client rooted at the server's `api/v1/`
//! - [`host::browser`] - Headless Chromium sessions for the web UI
//!
//! ## Orchestration
//!
//! - [`session::SessionProvider`] - One login per operation, yielding a single-use token
//! - [`executor::ActionExecutor`] - Performs an [`descriptor::ActionDescriptor`], always ending in an `Outcome`
//! - [`api::ApiActionExecutor`] - Direct authenticated API calls
//! - [`web::BrowserActionExecutor`] - Clicks through the web UI and watches for the completion toast
//! - [`operations::Operations`] - The `import`, `index` and `stats` facade
//!
//! ## Example
//!
//! ```ignore
//! use prismhelper_remote::{executor_for, OperationPlan, Operations, RemoteContext};
//!
//! let ctx = RemoteContext::builder(site_url, credentials).build()?;
//! let ops = Operations::new(Arc::new(ctx), executor_for(mode), OperationPlan::default());
//!
//! let outcome = ops.run_import().await;
//! println!("{} {}", outcome.code, outcome.message);
//! ```

pub mod api;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod host;
pub mod operations;
pub mod session;
pub mod stats;
pub mod web;

// Errors
pub use error::{BrowserError, HttpError, RemoteError};

// Host APIs
pub use host::{
    browser::{BrowserLauncher, BrowserSession, BrowserSettings, ChromiumLauncher, NodeProbe},
    http::{HttpClient, SESSION_HEADER},
};

// Orchestration
pub use api::ApiActionExecutor;
pub use context::{RemoteContext, RemoteContextBuilder, RemoteSettings};
pub use descriptor::{
    ActionDescriptor, ApiBinding, ImportPlan, IndexPlan, OperationPlan, PageBinding,
    DEFAULT_ACTION_TIMEOUT,
};
pub use executor::{executor_for, ActionExecutor};
pub use operations::{Operations, OUTCOME_LOG_TARGET};
pub use session::{AuthFailure, SessionProvider};
pub use stats::{StatsBody, StatsFilter, StatsResponse, STATS_ENDPOINT};
pub use web::BrowserActionExecutor;
