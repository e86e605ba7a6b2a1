// ============================================================
// Layer 5 — Predictor
// ============================================================
// Wraps a loaded LinearModel. Single-row predictions are clamped
// into the valid score range; batch predictions used for
// evaluation are left raw so metrics see the true residuals.

use anyhow::Result;

use crate::data::encoder::encode_row;
use crate::domain::model::{LinearModel, ModelInfo};
use crate::domain::record::{validate_hours, Difficulty, SCORE_MAX, SCORE_MIN};
use crate::domain::traits::ScorePredictor;
use crate::infra::checkpoint::ArtifactStore;

#[derive(Debug, Clone)]
pub struct Predictor {
    model: LinearModel,
}

impl Predictor {
    pub fn new(model: LinearModel) -> Self {
        Self { model }
    }

    pub fn from_artifact(store: &ArtifactStore) -> Result<Self> {
        let model = store.load()?;
        tracing::info!(
            "Model loaded from '{}' ({} features)",
            store.model_path().display(),
            model.n_features()
        );
        Ok(Self::new(model))
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Raw responses for already-encoded rows.
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.model.predict_row(r)).collect()
    }
}

impl ScorePredictor for Predictor {
    fn predict(&self, hours_studied: f64, difficulty: Difficulty) -> Result<f64> {
        let hours = validate_hours(hours_studied)?;
        let row   = encode_row(&self.model.feature_names, hours, difficulty);
        let raw   = self.model.predict_row(&row);

        tracing::debug!("hours={} difficulty={} raw={:.4}", hours, difficulty, raw);
        Ok(raw.clamp(SCORE_MIN, SCORE_MAX))
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::from(&self.model)
    }
}
