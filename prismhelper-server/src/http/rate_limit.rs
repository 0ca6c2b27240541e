//! Fixed-window request limiter.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use prismhelper_config::RateLimitConfig;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::warn;

use super::types::ErrorResponse;

/// Message returned with 429 responses.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// Key used when the peer address is unknown.
const UNKNOWN_PEER: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request may proceed.
    Allowed,
    /// Window exhausted; resets after the given duration.
    Limited(Duration),
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Counts requests in fixed windows, one window per client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    /// Creates a limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request from `client` made at `now`.
    pub fn check_at(&self, client: IpAddr, now: Instant) -> RateDecision {
        let mut clients = match self.clients.lock() {
            Ok(clients) => clients,
            Err(poisoned) => poisoned.into_inner(),
        };

        clients.retain(|_, window| now.saturating_duration_since(window.started) < self.window);

        let window = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if window.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(window.started);
            return RateDecision::Limited(self.window.saturating_sub(elapsed));
        }

        window.count += 1;
        RateDecision::Allowed
    }

    /// Records a request from `client` made now.
    pub fn check(&self, client: IpAddr) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        match self.clients.lock() {
            Ok(clients) => clients.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

/// Rate limiting middleware, keyed by the peer address.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(UNKNOWN_PEER, |ConnectInfo(addr)| addr.ip());

    match limiter.check(client) {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited(reset) => {
            warn!(%client, path = %request.uri().path(), "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, reset.as_secs().max(1).to_string())],
                Json(ErrorResponse::new(RATE_LIMITED_MESSAGE)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const BOB: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_limits_within_window() {
        let limiter = limiter(2);
        let now = Instant::now();

        assert_eq!(limiter.check_at(ALICE, now), RateDecision::Allowed);
        assert_eq!(limiter.check_at(ALICE, now), RateDecision::Allowed);
        assert!(matches!(
            limiter.check_at(ALICE, now + Duration::from_secs(10)),
            RateDecision::Limited(reset) if reset <= Duration::from_secs(50)
        ));
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1);
        let now = Instant::now();

        assert_eq!(limiter.check_at(ALICE, now), RateDecision::Allowed);
        assert!(matches!(limiter.check_at(ALICE, now), RateDecision::Limited(_)));
        assert_eq!(
            limiter.check_at(ALICE, now + Duration::from_secs(61)),
            RateDecision::Allowed
        );
    }

    #[test]
    fn test_clients_have_separate_windows() {
        let limiter = limiter(1);
        let now = Instant::now();

        assert_eq!(limiter.check_at(ALICE, now), RateDecision::Allowed);
        assert!(matches!(limiter.check_at(ALICE, now), RateDecision::Limited(_)));
        assert_eq!(limiter.check_at(BOB, now), RateDecision::Allowed);
    }

    #[test]
    fn test_expired_windows_are_evicted() {
        let limiter = limiter(5);
        let now = Instant::now();

        limiter.check_at(ALICE, now);
        limiter.check_at(BOB, now + Duration::from_secs(30));
        assert_eq!(limiter.tracked_clients(), 2);

        limiter.check_at(BOB, now + Duration::from_secs(61));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_zero_max_refuses_everything() {
        let limiter = limiter(0);
        assert!(matches!(limiter.check(ALICE), RateDecision::Limited(_)));
    }
}
