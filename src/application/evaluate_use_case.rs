// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Rebuilds the same train/test split as training (same seed,
// same test_size), loads the saved model and scores it on the
// test rows.

use anyhow::{bail, Result};

use crate::application::prepare_splits;
use crate::infra::{
    checkpoint::ArtifactStore,
    config::AppConfig,
    metrics::{MetricsLogger, RegressionMetrics},
};
use crate::ml::inferencer::Predictor;

pub struct EvaluateUseCase {
    config: AppConfig,
}

impl EvaluateUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<RegressionMetrics> {
        let cfg       = &self.config;
        let splits    = prepare_splits(cfg)?;
        let predictor = Predictor::from_artifact(&ArtifactStore::new(&cfg.model_path))?;

        if predictor.model().feature_names != splits.test.feature_names {
            bail!(
                "Model features {:?} do not match dataset features {:?}",
                predictor.model().feature_names,
                splits.test.feature_names
            );
        }

        let predictions = predictor.predict_rows(&splits.test.features);
        let metrics     = RegressionMetrics::compute(&splits.test.targets, &predictions)?;
        tracing::info!("Evaluated on {} test rows", metrics.rows);

        MetricsLogger::new(&cfg.metrics_path)?.log("evaluate", &metrics)?;
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{tests::fixture, TrainUseCase};
    use crate::infra::config::FeatureSpec;

    #[test]
    fn test_evaluate_matches_training_metrics() {
        let dir    = tempfile::tempdir().unwrap();
        let cfg    = fixture(dir.path());
        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();

        let metrics = EvaluateUseCase::new(cfg).execute().unwrap();
        assert_eq!(metrics.rows, report.test_rows);
        assert!((metrics.mae - report.test_metrics.mae).abs() < 1e-3);
    }

    #[test]
    fn test_evaluate_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        assert!(EvaluateUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_evaluate_rejects_feature_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let hours_only = AppConfig {
            feature: Some(FeatureSpec::One("hours_studied".into())),
            ..cfg
        };
        let err = EvaluateUseCase::new(hours_only).execute().unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }
}
