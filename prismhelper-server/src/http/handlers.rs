//! Request handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use prismhelper_core::Outcome;
use prismhelper_remote::{Operations, StatsBody, StatsFilter};
use serde_json::Value;
use std::sync::Arc;

use super::types::{HealthResponse, MessageResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Operation facade.
    pub operations: Arc<Operations>,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Starts an import.
pub async fn import(State(state): State<AppState>) -> Response {
    outcome_response(state.operations.run_import().await)
}

/// Starts an index run.
pub async fn index(State(state): State<AppState>) -> Response {
    outcome_response(state.operations.run_index().await)
}

/// Library statistics, filtered by the keys of the optional JSON body.
pub async fn stats(State(state): State<AppState>, body: Bytes) -> Response {
    let filter = serde_json::from_slice::<Value>(&body)
        .map(|value| StatsFilter::from_request_body(&value))
        .unwrap_or_default();

    let stats = state.operations.get_stats(&filter).await;
    let code = status(stats.status);
    match stats.body {
        StatsBody::Json(body) => (code, Json(body)).into_response(),
        StatsBody::Raw { content_type, text } => {
            let mut response = (code, text).into_response();
            if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            response
        }
    }
}

fn outcome_response(outcome: Outcome) -> Response {
    (
        status(outcome.code),
        Json(MessageResponse {
            message: outcome.message,
        }),
    )
        .into_response()
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
