//! HTTP API
//!
//! Single-process topology: the API routes plus, optionally, the frontend's
//! static files on one listener.

pub mod areas;
pub mod error;
pub mod handlers;
pub mod state;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use state::AppState;

/// API routes with permissive CORS and request tracing
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/areas", get(handlers::areas))
        .route("/areas/high-risk", get(handlers::high_risk_areas))
        .route("/areas/:district/:area/stats", get(handlers::area_stats))
        .route("/cases/similar", get(handlers::similar_cases))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve unmatched paths from `dir`, falling back to `index.html`
pub fn with_static_files(router: Router, dir: impl Into<PathBuf>) -> Router {
    let dir = dir.into();
    let index = ServeFile::new(dir.join("index.html"));
    router.fallback_service(ServeDir::new(dir).not_found_service(index))
}

pub(crate) fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind and serve until the process is stopped
pub async fn start_server(state: Arc<AppState>, addr: &str, static_dir: Option<&str>) -> Result<()> {
    let mut router = create_router(state);
    if let Some(dir) = static_dir {
        router = with_static_files(router, dir);
        info!(dir, "Serving static files");
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %listener.local_addr()?, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

pub(crate) async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(error) => {
            tracing::warn!(%error, "Signal handler unavailable; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
