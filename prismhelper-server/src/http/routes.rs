//! Route definitions.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::auth::{auth_middleware, AuthState};
use super::handlers::{self, AppState};
use super::rate_limit::{rate_limit_middleware, RateLimiter};

/// Creates the router with all routes.
pub fn create_router(app_state: AppState, auth_state: AuthState, limiter: Arc<RateLimiter>) -> Router {
    let protected = Router::new()
        .route("/import", post(handlers::import))
        .route("/index", post(handlers::index))
        .route("/stats", get(handlers::stats))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(app_state);

    Router::new()
        // Health check (no auth required)
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
}
