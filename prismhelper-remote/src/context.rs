//! Remote context providing access to host APIs.
//!
//! The context is passed to every executor and bundles what they need to
//! reach PhotoPrism: the shared HTTP client, the credentials, and a browser
//! launcher for the web UI fallback.

use prismhelper_core::Credentials;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::RemoteError;
use crate::host::{
    browser::{BrowserLauncher, BrowserSettings, ChromiumLauncher},
    http::HttpClient,
};

/// Path of the REST API below the site URL.
const API_PATH: &str = "api/v1/";

// ============================================================================
// Remote Settings
// ============================================================================

/// Settings shared by all operations.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    /// Site URL, always ending in `/`.
    pub site_url: Url,
    /// Timeout for the login call.
    pub session_timeout: Duration,
    /// How often the browser fallback polls the page.
    pub poll_interval: Duration,
    /// How long the browser fallback waits for a form field or button to render.
    pub element_timeout: Duration,
}

impl RemoteSettings {
    fn new(site_url: Url) -> Self {
        Self {
            site_url,
            session_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            element_timeout: Duration::from_secs(10),
        }
    }
}

// ============================================================================
// Remote Context
// ============================================================================

/// Context provided to executors.
pub struct RemoteContext {
    /// REST client rooted at `<site>/api/v1/`.
    pub http: Arc<HttpClient>,
    /// Remote account.
    pub credentials: Arc<Credentials>,
    /// Browser launcher for the web UI fallback.
    pub browser: Arc<dyn BrowserLauncher>,
    /// Shared settings.
    pub settings: RemoteSettings,
}

impl RemoteContext {
    /// Creates a builder for the given site.
    pub fn builder(site_url: Url, credentials: Credentials) -> RemoteContextBuilder {
        RemoteContextBuilder::new(site_url, credentials)
    }

    /// Resolves a web UI path against the site URL.
    pub fn page_url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.settings.site_url.join(path.trim_start_matches('/'))
    }

    /// Returns the login timeout.
    pub fn session_timeout(&self) -> Duration {
        self.settings.session_timeout
    }
}

impl std::fmt::Debug for RemoteContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteContext")
            .field("credentials", &self.credentials)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Remote Context Builder
// ============================================================================

/// Builder for constructing a [`RemoteContext`].
pub struct RemoteContextBuilder {
    credentials: Credentials,
    http: Option<Arc<HttpClient>>,
    browser: Option<Arc<dyn BrowserLauncher>>,
    settings: RemoteSettings,
}

impl RemoteContextBuilder {
    fn new(site_url: Url, credentials: Credentials) -> Self {
        Self {
            credentials,
            http: None,
            browser: None,
            settings: RemoteSettings::new(site_url),
        }
    }

    /// Sets the login timeout.
    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.settings.session_timeout = timeout;
        self
    }

    /// Sets the toast polling interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval = interval;
        self
    }

    /// Sets how long the browser fallback waits for page elements.
    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.settings.element_timeout = timeout;
        self
    }

    /// Sets the browser launcher.
    pub fn browser(mut self, browser: Arc<dyn BrowserLauncher>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Sets the HTTP client.
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Builds the context, creating defaults for anything not set.
    pub fn build(self) -> Result<RemoteContext, RemoteError> {
        let http = match self.http {
            Some(http) => http,
            None => Arc::new(HttpClient::new(self.settings.site_url.join(API_PATH)?)?),
        };
        let browser = self
            .browser
            .unwrap_or_else(|| Arc::new(ChromiumLauncher::new(BrowserSettings::default())));

        Ok(RemoteContext {
            http,
            credentials: Arc::new(self.credentials),
            browser,
            settings: self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(site: &str) -> RemoteContext {
        RemoteContext::builder(Url::parse(site).unwrap(), Credentials::new("admin", "pw"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_api_base_below_site() {
        let ctx = context("https://nas.example.com/photos/");
        assert_eq!(
            ctx.http.api_base().as_str(),
            "https://nas.example.com/photos/api/v1/"
        );
    }

    #[test]
    fn test_page_url() {
        let ctx = context("http://localhost:2342/");
        assert_eq!(
            ctx.page_url("library/import").unwrap().as_str(),
            "http://localhost:2342/library/import"
        );
    }

    #[test]
    fn test_builder_overrides() {
        let ctx = RemoteContext::builder(
            Url::parse("http://localhost:2342/").unwrap(),
            Credentials::new("admin", "pw"),
        )
        .session_timeout(Duration::from_millis(500))
        .poll_interval(Duration::from_millis(10))
        .element_timeout(Duration::from_secs(3))
        .build()
        .unwrap();

        assert_eq!(ctx.session_timeout(), Duration::from_millis(500));
        assert_eq!(ctx.settings.poll_interval, Duration::from_millis(10));
        assert_eq!(ctx.settings.element_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_debug_hides_password() {
        let ctx = context("http://localhost:2342/");
        assert!(!format!("{ctx:?}").contains("pw\""));
    }
}
