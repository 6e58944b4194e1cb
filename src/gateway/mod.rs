//! Split topology front process
//!
//! Serves the frontend's static files and forwards `/predict` and `/chat` to
//! a backend API process, relaying its status and body unchanged.

use crate::cli::config::GatewayConfig;
use crate::server::{cors, shutdown_signal, with_static_files};
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Timeout for the backend health probe
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

pub struct GatewayState {
    client: Client,
    backend_url: String,
}

impl GatewayState {
    pub fn new(backend_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Relay a JSON POST to the backend
    async fn forward(&self, path: &str, body: Bytes) -> Response {
        let url = format!("{}{}", self.backend_url, path);

        let result = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await;

        let upstream = match result {
            Ok(upstream) => upstream,
            Err(error) => {
                warn!(%error, %url, "Backend unreachable");
                return unavailable(&error.to_string());
            }
        };

        let status = StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = upstream
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        match upstream.bytes().await {
            Ok(bytes) => (status, [(header::CONTENT_TYPE, content_type)], bytes).into_response(),
            Err(error) => {
                warn!(%error, %url, "Backend response interrupted");
                unavailable(&error.to_string())
            }
        }
    }

    async fn backend_reachable(&self) -> bool {
        let url = format!("{}/health", self.backend_url);
        matches!(
            self.client.get(&url).timeout(HEALTH_PROBE_TIMEOUT).send().await,
            Ok(r) if r.status().is_success()
        )
    }
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "Backend service unavailable",
            "message": message,
        })),
    )
        .into_response()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GatewayHealth {
    pub status: String,
    pub backend_url: String,
    pub backend_reachable: bool,
}

async fn predict(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    state.forward("/predict", body).await
}

async fn chat(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    state.forward("/chat", body).await
}

async fn health(State(state): State<Arc<GatewayState>>) -> Json<GatewayHealth> {
    Json(GatewayHealth {
        status: "healthy".to_string(),
        backend_url: state.backend_url.clone(),
        backend_reachable: state.backend_reachable().await,
    })
}

pub fn create_gateway_router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_gateway(config: &GatewayConfig) -> Result<()> {
    let state = Arc::new(GatewayState::new(
        &config.backend_url,
        Duration::from_secs(config.timeout_secs),
    )?);

    let mut router = create_gateway_router(state);
    if let Some(dir) = config.static_dir.as_deref() {
        router = with_static_files(router, dir);
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %listener.local_addr()?, backend = %config.backend_url, "Gateway listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway error")
}
