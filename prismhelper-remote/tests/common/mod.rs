//! In-process mock of the PhotoPrism REST API.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prismhelper_core::Credentials;
use prismhelper_remote::{RemoteContext, SESSION_HEADER};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "photoprism";

/// Scripted server behaviour plus call records.
pub struct MockPhotoPrism {
    pub password: String,
    pub action_status: u16,
    pub action_body: Value,
    pub action_delay: Duration,
    pub stats_status: u16,
    pub stats_body: Value,
    /// Plain-text stats body served instead of `stats_body`.
    pub stats_text: Option<&'static str>,

    pub session_calls: AtomicUsize,
    pub action_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub last_action: Mutex<Option<(String, Value)>>,
}

impl Default for MockPhotoPrism {
    fn default() -> Self {
        Self {
            password: PASSWORD.to_string(),
            action_status: 200,
            action_body: json!({"message": "completed"}),
            action_delay: Duration::ZERO,
            stats_status: 200,
            stats_body: json!({"a": 1, "b": 2, "c": 3}),
            stats_text: None,
            session_calls: AtomicUsize::new(0),
            action_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
            last_action: Mutex::new(None),
        }
    }
}

impl MockPhotoPrism {
    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn action_calls(&self) -> usize {
        self.action_calls.load(Ordering::SeqCst)
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn last_action(&self) -> Option<(String, Value)> {
        self.last_action.lock().unwrap().clone()
    }
}

type Shared = Arc<MockPhotoPrism>;

async fn session(State(mock): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    mock.session_calls.fetch_add(1, Ordering::SeqCst);
    let user_ok = body["username"] == USERNAME;
    let pass_ok = body["password"] == mock.password.as_str();
    if user_ok && pass_ok {
        (StatusCode::OK, Json(json!({"id": "sess-1234", "user": {"Name": USERNAME}})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"})))
    }
}

async fn action(mock: &MockPhotoPrism, name: &str, headers: &HeaderMap, body: Value) -> (StatusCode, Json<Value>) {
    mock.action_calls.fetch_add(1, Ordering::SeqCst);
    if headers.get(SESSION_HEADER).is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})));
    }
    *mock.last_action.lock().unwrap() = Some((name.to_string(), body));
    if !mock.action_delay.is_zero() {
        tokio::time::sleep(mock.action_delay).await;
    }
    (
        StatusCode::from_u16(mock.action_status).unwrap(),
        Json(mock.action_body.clone()),
    )
}

async fn import(State(mock): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    action(&mock, "import", &headers, body).await
}

async fn index(State(mock): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    action(&mock, "index", &headers, body).await
}

async fn stats(State(mock): State<Shared>, headers: HeaderMap) -> Response {
    mock.stats_calls.fetch_add(1, Ordering::SeqCst);
    if headers.get(SESSION_HEADER).is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response();
    }
    let status = StatusCode::from_u16(mock.stats_status).unwrap();
    match mock.stats_text {
        Some(text) => (status, [(header::CONTENT_TYPE, "text/plain")], text).into_response(),
        None => (status, Json(mock.stats_body.clone())).into_response(),
    }
}

/// Serves `mock` on an ephemeral port and returns the site URL.
pub async fn spawn(mock: MockPhotoPrism) -> (Url, Shared) {
    let mock = Arc::new(mock);
    let app = Router::new()
        .route("/api/v1/session", post(session))
        .route("/api/v1/import", post(import))
        .route("/api/v1/index", post(index))
        .route("/api/v1/stats", get(stats))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}/")).unwrap(), mock)
}

/// A site URL nothing listens on.
pub async fn dead_site() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

pub fn context(site: Url) -> Arc<RemoteContext> {
    context_with_password(site, PASSWORD)
}

pub fn context_with_password(site: Url, password: &str) -> Arc<RemoteContext> {
    Arc::new(
        RemoteContext::builder(site, Credentials::new(USERNAME, password))
            .session_timeout(Duration::from_secs(2))
            .build()
            .unwrap(),
    )
}
