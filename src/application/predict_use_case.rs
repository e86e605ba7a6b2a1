use anyhow::Result;
use std::path::Path;

use crate::domain::record::Difficulty;
use crate::domain::traits::ScorePredictor;
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::inferencer::Predictor;

/// Loads the saved model once and predicts single rows.
pub struct PredictUseCase {
    predictor: Box<dyn ScorePredictor>,
}

impl PredictUseCase {
    pub fn from_model_path(model_path: impl AsRef<Path>) -> Result<Self> {
        let store = ArtifactStore::new(model_path.as_ref());
        Ok(Self::new(Box::new(Predictor::from_artifact(&store)?)))
    }

    pub fn new(predictor: Box<dyn ScorePredictor>) -> Self {
        Self { predictor }
    }

    pub fn predict(&self, hours_studied: f64, difficulty: Difficulty) -> Result<f64> {
        self.predictor.predict(hours_studied, difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{tests::fixture, TrainUseCase};

    #[test]
    fn test_predict_with_trained_model() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let uc    = PredictUseCase::from_model_path(&cfg.model_path).unwrap();
        let score = uc.predict(4.0, Difficulty::Medium).unwrap();
        assert!((score - 50.0).abs() < 1e-2, "score={score}");
        assert!(uc.predict(4.0, Difficulty::Hard).unwrap() < score);
    }

    #[test]
    fn test_predict_without_model() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PredictUseCase::from_model_path(dir.path().join("model")).is_err());
    }
}
