// ============================================================
// Layer 7 — HTTP Server (axum)
// ============================================================
// A read-only model shared through `Arc` by every request. The
// server starts even when no artifact exists yet, so /health
// answers and the model endpoints return 500 until `train` runs
// and the server is restarted.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::domain::traits::ScorePredictor;
use crate::infra::{checkpoint::ArtifactStore, config::AppConfig};
use crate::ml::inferencer::Predictor;
use error::ApiError;

#[derive(Clone, Default)]
pub struct AppState {
    predictor: Option<Arc<dyn ScorePredictor>>,
}

impl AppState {
    pub fn new(predictor: Option<Arc<dyn ScorePredictor>>) -> Self {
        Self { predictor }
    }

    /// Load the artifact if present. A missing or unreadable artifact
    /// is logged and leaves the server without a model.
    pub fn from_artifact(store: &ArtifactStore) -> Self {
        if !store.exists() {
            tracing::warn!(
                "No model at '{}'; serving without a model",
                store.record_path().display()
            );
            return Self::default();
        }
        match Predictor::from_artifact(store) {
            Ok(p) => Self::new(Some(Arc::new(p))),
            Err(e) => {
                tracing::error!("Failed to load model: {e:#}");
                Self::default()
            }
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    pub fn predictor(&self) -> Result<&Arc<dyn ScorePredictor>, ApiError> {
        self.predictor.as_ref().ok_or(ApiError::ModelNotLoaded)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/model_info", get(handlers::model_info))
        .fallback(handlers::not_found)
        .with_state(state)
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = AppState::from_artifact(&ArtifactStore::new(&config.model_path));
    let addr  = format!("{}:{}", config.server.host, config.server.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
    }
}
