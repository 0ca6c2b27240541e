//! Host APIs for reaching the PhotoPrism server.
//!
//! - [`http`] - REST client rooted at the server's `api/v1/`
//! - [`browser`] - Headless Chromium sessions for the web UI

pub mod browser;
pub mod http;

// Re-export key types
pub use browser::{BrowserLauncher, BrowserSession, BrowserSettings, ChromiumLauncher, NodeProbe};
pub use http::HttpClient;
