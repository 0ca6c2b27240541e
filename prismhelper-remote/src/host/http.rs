//! HTTP client for the PhotoPrism REST API.
//!
//! Wraps `reqwest` with:
//! - A fixed API base (`<site>/api/v1/`) that endpoint names are joined onto
//! - Per-request timeouts
//! - The `X-Session-ID` header, fed from a consumed [`SessionToken`]
//! - Request/response tracing

use prismhelper_core::SessionToken;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for PrismHelper.
const USER_AGENT: &str = concat!("PrismHelper/", env!("CARGO_PKG_VERSION"));

/// Header carrying the session id on authenticated calls.
pub const SESSION_HEADER: &str = "X-Session-ID";

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client rooted at the remote API base.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    api_base: Url,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    pub fn new(api_base: Url) -> Result<Self, HttpError> {
        Self::with_timeout(api_base, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom default timeout.
    ///
    /// Individual requests may override it.
    pub fn with_timeout(api_base: Url, timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner, api_base })
    }

    /// Returns the API base URL.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Resolves an endpoint name against the API base.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, HttpError> {
        self.api_base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    /// Performs a POST with a JSON body.
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("POST request with JSON");

        self.send(self.inner.post(url).json(body), timeout).await
    }

    /// Performs an authenticated POST with a JSON body.
    ///
    /// The session token is consumed by the request.
    #[instrument(skip(self, body, session), fields(endpoint = %endpoint))]
    pub async fn post_json_with_session<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
        session: SessionToken,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("POST request with session");

        let request = self
            .inner
            .post(url)
            .header(SESSION_HEADER, session.into_header_value())
            .json(body);
        self.send(request, timeout).await
    }

    /// Performs an authenticated GET.
    ///
    /// The session token is consumed by the request.
    #[instrument(skip(self, session), fields(endpoint = %endpoint))]
    pub async fn get_with_session(
        &self,
        endpoint: &str,
        session: SessionToken,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        let url = self.endpoint_url(endpoint)?;
        debug!("GET request with session");

        let request = self
            .inner
            .get(url)
            .header(SESSION_HEADER, session.into_header_value());
        self.send(request, timeout).await
    }

    async fn send(&self, request: RequestBuilder, timeout: Duration) -> Result<Response, HttpError> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| HttpError::from_request(e, timeout))?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        let client = client("http://localhost:2342/api/v1/");
        assert_eq!(
            client.endpoint_url("session").unwrap().as_str(),
            "http://localhost:2342/api/v1/session"
        );
        assert_eq!(
            client.endpoint_url("/import").unwrap().as_str(),
            "http://localhost:2342/api/v1/import"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_site_prefix() {
        let client = client("https://nas.example.com/photos/api/v1/");
        assert_eq!(
            client.endpoint_url("index").unwrap().as_str(),
            "https://nas.example.com/photos/api/v1/index"
        );
    }
}
