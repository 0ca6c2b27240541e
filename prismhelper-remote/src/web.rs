//! Web UI executor.
//!
//! Drives a headless browser through the PhotoPrism library pages: log in,
//! click the operation's button, then wait for the completion toast. Used
//! where the REST API is unavailable or misbehaving.
//!
//! ## Outcomes
//!
//! | Situation | Outcome |
//! |---|---|
//! | Toast with text | `200 "PhotoPrism <text>"` |
//! | Toast without text | `200 "Success message not found in the timeout time."` |
//! | Toast never appears | `500 <timeout message>` |
//! | Anything else | `500 "An unknown internal error occurred."` |
//!
//! The browser is closed on every path.

use async_trait::async_trait;
use prismhelper_core::{ExecutionMode, Outcome, SUCCESS_MESSAGE_NOT_FOUND};
use tracing::{debug, error, instrument, warn};

use crate::context::RemoteContext;
use crate::descriptor::ActionDescriptor;
use crate::error::BrowserError;
use crate::executor::ActionExecutor;
use crate::host::browser::BrowserSession;

/// Login form username field.
pub const USERNAME_SELECTOR: &str = r#"input[aria-label="Name"]"#;

/// Login form password field.
pub const PASSWORD_SELECTOR: &str = r#"input[aria-label="Password"]"#;

/// Login form submit button.
pub const CONFIRM_SELECTOR: &str = r#"button[class*="action-confirm"]"#;

/// Close-button label that leaks into the toast text.
const TOAST_CLOSE_SUFFIX: &str = "close";

// ============================================================================
// Browser Action Executor
// ============================================================================

/// Runs operations by clicking through the web UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserActionExecutor;

impl BrowserActionExecutor {
    /// Creates the executor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionExecutor for BrowserActionExecutor {
    fn id(&self) -> &str {
        "photoprism.web"
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Browser
    }

    #[instrument(skip(self, ctx, descriptor), fields(operation = %descriptor.operation))]
    async fn perform(&self, ctx: &RemoteContext, descriptor: &ActionDescriptor) -> Outcome {
        let mut session = match ctx.browser.launch().await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Browser launch failed");
                return Outcome::internal_error();
            }
        };

        let result = drive(session.as_mut(), ctx, descriptor).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "Browser did not close cleanly");
        }

        match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_timeout() => {
                warn!(error = %e, "Completion toast did not appear");
                Outcome::failure(e.to_string())
            }
            Err(e) => {
                error!(error = %e, "Web UI interaction failed");
                Outcome::internal_error()
            }
        }
    }
}

// ============================================================================
// Page Flow
// ============================================================================

async fn drive(
    session: &mut dyn BrowserSession,
    ctx: &RemoteContext,
    descriptor: &ActionDescriptor,
) -> Result<Outcome, BrowserError> {
    let url = ctx.page_url(descriptor.page.path)?;

    session.goto(url.as_str()).await?;
    wait_for_element(session, ctx, USERNAME_SELECTOR).await?;
    session
        .type_into(USERNAME_SELECTOR, &ctx.credentials.username)
        .await?;
    session
        .type_into(PASSWORD_SELECTOR, &ctx.credentials.password)
        .await?;
    session.click_and_wait_for_navigation(CONFIRM_SELECTOR).await?;
    debug!("Logged into web UI");

    // The login is a client-side route change, so the library view may still be rendering.
    wait_for_element(session, ctx, &descriptor.page.action_selector).await?;
    session.click(&descriptor.page.action_selector).await?;
    debug!("Action triggered");

    let text = session
        .wait_for_selector(
            descriptor.page.success_selector,
            descriptor.timeout,
            ctx.settings.poll_interval,
        )
        .await?;

    Ok(match text.as_deref().and_then(toast_message) {
        Some(message) => Outcome::ok(format!("PhotoPrism {message}")),
        None => Outcome::ok(SUCCESS_MESSAGE_NOT_FOUND),
    })
}

/// Waits for a form field or button. Only the toast wait reports a timeout
/// outcome, so a missing element surfaces as [`BrowserError::SelectorNotFound`].
async fn wait_for_element(
    session: &mut dyn BrowserSession,
    ctx: &RemoteContext,
    selector: &str,
) -> Result<(), BrowserError> {
    let timeout = ctx.settings.element_timeout;
    match session
        .wait_for_selector(selector, timeout, ctx.settings.poll_interval)
        .await
    {
        Ok(_) => Ok(()),
        Err(e) if e.is_timeout() => Err(BrowserError::SelectorNotFound {
            selector: selector.to_string(),
            reason: format!("not rendered within {}ms", timeout.as_millis()),
        }),
        Err(e) => Err(e),
    }
}

/// Cleans toast text. Returns `None` when nothing is left.
fn toast_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let cleaned = trimmed
        .strip_suffix(TOAST_CLOSE_SUFFIX)
        .unwrap_or(trimmed)
        .trim_end();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_message_strips_close() {
        assert_eq!(
            toast_message("  Import completed in 3 s close \n").as_deref(),
            Some("Import completed in 3 s")
        );
        assert_eq!(
            toast_message("Indexing completed").as_deref(),
            Some("Indexing completed")
        );
    }

    #[test]
    fn test_toast_message_empty() {
        assert_eq!(toast_message("   "), None);
        assert_eq!(toast_message("close"), None);
    }
}
