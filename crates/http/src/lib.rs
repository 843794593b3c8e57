//! tailview HTTP - operator page server
//!
//! A thin axum app serving the operator-facing live-tail page and a
//! health endpoint. The page is static HTML whose embedded script opens a
//! WebSocket to the stream server; the core crates have no dependency on
//! anything here.
//!
//! # Endpoints
//!
//! - `GET /` - live-tail page
//! - `GET /health` - liveness response with uptime

use std::time::Instant;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Operator page template; the stream port is substituted at render time
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state for the page server
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    start_time: Instant,
    /// Port of the stream server the page connects to
    stream_port: u16,
}

impl AppState {
    /// Create state pointing the page at a stream port
    pub fn new(stream_port: u16) -> Self {
        Self {
            start_time: Instant::now(),
            stream_port,
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server status
    pub status: &'static str,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Build the page server router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve the router on the given address until cancelled
///
/// # Errors
///
/// Returns an IO error if the listener cannot be bound.
pub async fn serve(
    addr: &str,
    state: AppState,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "page server listening");

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            debug!("page server cancelled");
        })
        .await
}

/// Render the live-tail page
///
/// GET /
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_HTML.replace("__STREAM_PORT__", &state.stream_port.to_string()))
}

/// Liveness check
///
/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
    })
}
