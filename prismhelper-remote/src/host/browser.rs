//! Headless browser sessions for driving the PhotoPrism web UI.
//!
//! [`BrowserLauncher`] starts a fresh, isolated browser per call and hands
//! back a [`BrowserSession`] holding one page. The production implementation
//! is [`ChromiumLauncher`] (Chromium over the DevTools protocol via
//! `chromiumoxide`); tests substitute scripted sessions.
//!
//! Sessions must be released with [`BrowserSession::close`]. Dropping a
//! [`ChromiumSession`] without closing still kills the process, but without
//! waiting for it to exit.

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::error::BrowserError;

/// Flags required to run Chromium headless inside containers.
const CHROMIUM_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-setuid-sandbox",
    "--no-sandbox",
];

/// Default timeout for individual DevTools requests.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Traits
// ============================================================================

/// Result of looking a selector up once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeProbe {
    /// No element matches yet.
    Absent,
    /// An element matches; `text` is its rendered text, if it has any.
    Present {
        /// Rendered text content.
        text: Option<String>,
    },
}

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launches a fresh browser with one blank page.
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// A running browser with a single page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url` and waits for the page to settle.
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Focuses the element matching `selector` and types `text` into it.
    async fn type_into(&mut self, selector: &str, text: &str) -> Result<(), BrowserError>;

    /// Clicks the element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Clicks the element matching `selector` and waits for the navigation it triggers.
    async fn click_and_wait_for_navigation(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Looks `selector` up once without waiting.
    async fn probe(&mut self, selector: &str) -> Result<NodeProbe, BrowserError>;

    /// Polls `selector` every `interval` until it matches, returning the
    /// element's text. Fails with [`BrowserError::Timeout`] after `timeout`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<Option<String>, BrowserError> {
        let poll = async {
            loop {
                if let NodeProbe::Present { text } = self.probe(selector).await? {
                    return Ok::<_, BrowserError>(text);
                }
                tokio::time::sleep(interval).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| BrowserError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            })?
    }

    /// Shuts the browser down and releases its resources.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

// ============================================================================
// Chromium Launcher
// ============================================================================

/// Settings for launching Chromium.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Browser binary. Auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Timeout for individual DevTools requests.
    pub request_timeout: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl BrowserSettings {
    /// Settings pinned to a browser binary.
    pub fn with_executable(mut self, executable: Option<PathBuf>) -> Self {
        self.executable = executable;
        self
    }
}

/// Launches headless Chromium, one isolated profile per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    /// Creates a launcher.
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    /// Resolves the configured executable.
    ///
    /// Bare names are looked up on `PATH`; absolute paths must exist.
    fn resolve_executable(&self) -> Result<Option<PathBuf>, BrowserError> {
        let Some(ref executable) = self.settings.executable else {
            return Ok(None);
        };

        if executable.components().count() > 1 || executable.is_absolute() {
            if executable.exists() {
                Ok(Some(executable.clone()))
            } else {
                Err(BrowserError::BrowserNotFound(executable.display().to_string()))
            }
        } else {
            which::which(executable)
                .map(Some)
                .map_err(|e| BrowserError::BrowserNotFound(format!("{}: {e}", executable.display())))
        }
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .args(CHROMIUM_ARGS.iter().copied())
            .user_data_dir(profile_dir)
            .request_timeout(self.settings.request_timeout);

        if let Some(executable) = self.resolve_executable()? {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(BrowserError::LaunchFailed)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    #[instrument(skip(self))]
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let profile = TempDir::new()?;
        let config = self.browser_config(profile.path())?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // The handler drives the DevTools connection and must be polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!(error = %close_err, "Failed to close browser after page error");
                }
                let _ = browser.wait().await;
                handler.abort();
                return Err(e.into());
            }
        };

        debug!("Browser launched");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
            _profile: profile,
        }))
    }
}

// ============================================================================
// Chromium Session
// ============================================================================

/// A running Chromium process with one page.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl ChromiumSession {
    async fn element(&self, selector: &str) -> Result<chromiumoxide::Element, BrowserError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::SelectorNotFound {
                selector: selector.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    #[instrument(skip(self))]
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        let navigation = |e: chromiumoxide::error::CdpError| BrowserError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        self.page.goto(url).await.map_err(navigation)?;
        self.page.wait_for_navigation().await.map_err(navigation)?;
        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn type_into(&mut self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let element = self.element(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.element(selector).await?.click().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn click_and_wait_for_navigation(&mut self, selector: &str) -> Result<(), BrowserError> {
        self.element(selector).await?.click().await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn probe(&mut self, selector: &str) -> Result<NodeProbe, BrowserError> {
        let elements = self.page.find_elements(selector).await?;
        match elements.first() {
            None => Ok(NodeProbe::Absent),
            Some(element) => Ok(NodeProbe::Present {
                text: element.inner_text().await?,
            }),
        }
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Failed waiting for browser exit");
        }
        self.handler.abort();
        debug!("Browser closed");
        closed.map(|_| ()).map_err(BrowserError::from)
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_executable_means_autodetect() {
        let launcher = ChromiumLauncher::default();
        assert_eq!(launcher.resolve_executable().unwrap(), None);
    }

    #[test]
    fn test_missing_absolute_executable() {
        let launcher = ChromiumLauncher::new(
            BrowserSettings::default()
                .with_executable(Some(PathBuf::from("/definitely/not/chromium-browser"))),
        );
        assert!(matches!(
            launcher.resolve_executable(),
            Err(BrowserError::BrowserNotFound(_))
        ));
    }

    #[test]
    fn test_missing_bare_executable() {
        let launcher = ChromiumLauncher::new(
            BrowserSettings::default()
                .with_executable(Some(PathBuf::from("no-such-browser-binary-xyz"))),
        );
        assert!(launcher.resolve_executable().is_err());
    }
}
