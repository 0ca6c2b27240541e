//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use prismhelper_config::ServerConfig;
use prismhelper_remote::Operations;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::auth::AuthState;
use super::handlers::AppState;
use super::rate_limit::RateLimiter;
use super::routes::create_router;

/// HTTP relay server.
pub struct HttpServer {
    config: ServerConfig,
    operations: Arc<Operations>,
}

impl HttpServer {
    /// Creates a server.
    pub fn new(config: ServerConfig, operations: Arc<Operations>) -> Self {
        Self { config, operations }
    }

    /// Address the server binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.config.port))
    }

    /// Runs until `shutdown` fires.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr = self.listen_addr();

        let app = create_router(
            AppState {
                operations: self.operations.clone(),
            },
            AuthState::new(&self.config.api_key),
            Arc::new(RateLimiter::new(self.config.rate_limit)),
        )
        .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;

        info!("PrismHelper listening on port {}", self.config.port);

        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
