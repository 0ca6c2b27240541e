//! Direct REST API executor.

use async_trait::async_trait;
use prismhelper_core::{ExecutionMode, Outcome};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::{error, instrument, warn};

use crate::context::RemoteContext;
use crate::descriptor::ActionDescriptor;
use crate::executor::ActionExecutor;
use crate::session::SessionProvider;

/// Runs operations with one login and one authenticated API call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiActionExecutor;

impl ApiActionExecutor {
    /// Creates the executor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionExecutor for ApiActionExecutor {
    fn id(&self) -> &str {
        "photoprism.api"
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Api
    }

    #[instrument(skip(self, ctx, descriptor), fields(operation = %descriptor.operation))]
    async fn perform(&self, ctx: &RemoteContext, descriptor: &ActionDescriptor) -> Outcome {
        let token = match SessionProvider::new(ctx).login().await {
            Ok(token) => token,
            Err(failure) => {
                warn!(%failure, "Authentication failed");
                return Outcome::invalid_credentials();
            }
        };

        let response = ctx
            .http
            .post_json_with_session(
                descriptor.api.endpoint,
                &descriptor.api.body,
                token,
                descriptor.timeout,
            )
            .await;

        match response {
            Ok(response) => outcome_from_response(response).await,
            Err(e) => {
                error!(error = %e, "Action request failed");
                Outcome::unknown_error()
            }
        }
    }
}

/// Translates any remote HTTP response into an outcome, keeping its status.
async fn outcome_from_response(response: Response) -> Outcome {
    let status = response.status();
    let body: Option<Value> = response.json().await.ok();
    Outcome::new(status.as_u16(), response_message(status, body.as_ref()))
}

/// Picks the message: `message`, then `error`, then the status reason.
pub(crate) fn response_message(status: StatusCode, body: Option<&Value>) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    field("message")
        .or_else(|| field("error"))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_preferred() {
        let body = json!({"message": "Import started", "error": "ignored"});
        assert_eq!(response_message(StatusCode::OK, Some(&body)), "Import started");
    }

    #[test]
    fn test_error_fallback() {
        let body = json!({"error": "Permission denied"});
        assert_eq!(
            response_message(StatusCode::FORBIDDEN, Some(&body)),
            "Permission denied"
        );
    }

    #[test]
    fn test_reason_fallback() {
        assert_eq!(
            response_message(StatusCode::SERVICE_UNAVAILABLE, None),
            "Service Unavailable"
        );
        let body = json!({"message": 42});
        assert_eq!(response_message(StatusCode::OK, Some(&body)), "OK");
    }
}
