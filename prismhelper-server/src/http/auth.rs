//! Bearer key authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use super::types::ErrorResponse;

/// Shared state for authentication.
#[derive(Clone)]
pub struct AuthState {
    api_key: Arc<str>,
}

impl AuthState {
    /// Creates state accepting `api_key`.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
        }
    }

    /// Checks an `Authorization` header value.
    pub fn check(&self, header: Option<&HeaderValue>) -> Result<(), AuthRejection> {
        let header = header.ok_or(AuthRejection::MissingHeader)?;
        let value = header.to_str().map_err(|_| AuthRejection::Malformed)?;

        let parts: Vec<&str> = value.split(' ').collect();
        let [scheme, key] = parts.as_slice() else {
            return Err(AuthRejection::Malformed);
        };
        if *scheme != "Bearer" {
            return Err(AuthRejection::Malformed);
        }
        if *key != &*self.api_key {
            return Err(AuthRejection::InvalidKey);
        }
        Ok(())
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization` header.
    MissingHeader,
    /// Not exactly `Bearer <key>`.
    Malformed,
    /// Wrong key.
    InvalidKey,
}

impl AuthRejection {
    /// Message returned to the caller.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingHeader => "Request contained no authorization header.",
            Self::Malformed => "Request authorization header incorrectly formatted.",
            Self::InvalidKey => "Invalid API Key",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, Json(ErrorResponse::new(self.message()))).into_response()
    }
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match auth.check(request.headers().get(header::AUTHORIZATION)) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            debug!(path = %request.uri().path(), reason = rejection.message(), "Request refused");
            rejection.into_response()
        }
    }
}
