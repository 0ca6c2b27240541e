//! Remote login.
//!
//! Every operation logs in afresh. Nothing is cached: the returned
//! [`SessionToken`] is consumed by the one request it authorizes.

use prismhelper_core::SessionToken;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument};

use crate::context::RemoteContext;

/// Login endpoint below the API base.
pub const SESSION_ENDPOINT: &str = "session";

/// Why a login did not produce a token.
///
/// This is a value for the caller to log and translate, never a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The request did not complete.
    Transport(String),
    /// The server answered with a non-success status.
    Rejected {
        /// HTTP status code.
        status: u16,
    },
    /// The server answered 2xx without a usable session id.
    MalformedResponse(String),
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "login request failed: {reason}"),
            Self::Rejected { status } => write!(f, "login rejected with status {status}"),
            Self::MalformedResponse(reason) => write!(f, "login response malformed: {reason}"),
        }
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(default)]
    id: Option<String>,
}

/// Obtains session tokens with the context's credentials.
#[derive(Debug)]
pub struct SessionProvider<'a> {
    ctx: &'a RemoteContext,
}

impl<'a> SessionProvider<'a> {
    /// Creates a provider for the given context.
    pub fn new(ctx: &'a RemoteContext) -> Self {
        Self { ctx }
    }

    /// Logs in once, bounded by the session timeout.
    #[instrument(skip(self))]
    pub async fn login(&self) -> Result<SessionToken, AuthFailure> {
        let response = self
            .ctx
            .http
            .post_json(
                SESSION_ENDPOINT,
                self.ctx.credentials.as_ref(),
                self.ctx.session_timeout(),
            )
            .await
            .map_err(|e| AuthFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthFailure::Rejected {
                status: status.as_u16(),
            });
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthFailure::MalformedResponse(e.to_string()))?;

        let token = body
            .id
            .and_then(SessionToken::new)
            .ok_or_else(|| AuthFailure::MalformedResponse("missing session id".to_string()))?;

        debug!("Session acquired");
        Ok(token)
    }
}
