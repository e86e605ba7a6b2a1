// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the full training pipeline in order:
//
//   Step 1: Summarise the raw dataset      (Layer 4 - data)
//   Step 2: Load, encode and split         (Layer 4 - data)
//   Step 3: Fit the model                  (Layer 5 - ml)
//   Step 4: Save the artifact              (Layer 6 - infra)
//   Step 5: Score the held-out split       (Layer 5 + 6)
//   Step 6: Append to the metrics log      (Layer 6 - infra)

use anyhow::Result;

use crate::application::prepare_splits;
use crate::data::loader::{summarize, CsvLoader};
use crate::domain::model::LinearModel;
use crate::domain::traits::RecordSource;
use crate::infra::{
    checkpoint::ArtifactStore,
    config::AppConfig,
    metrics::{MetricsLogger, RegressionMetrics},
};
use crate::ml::{inferencer::Predictor, trainer::fit};

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model:        LinearModel,
    pub train_rows:   usize,
    pub test_rows:    usize,
    pub test_metrics: RegressionMetrics,
}

pub struct TrainUseCase {
    config: AppConfig,
}

impl TrainUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Dataset summary ───────────────────────────────────────────
        // Only possible when the file has the standard three columns.
        match CsvLoader::new(&cfg.data_path).load_records() {
            Ok(records) => {
                let s = summarize(&records);
                tracing::info!(
                    "Dataset: {} rows, per difficulty {:?}, mean hours {:.2}, mean score {:.2}",
                    s.rows, s.per_difficulty, s.mean_hours, s.mean_score
                );
                if s.out_of_range_scores > 0 {
                    tracing::warn!("{} rows have a score outside [0, 100]", s.out_of_range_scores);
                }
            }
            Err(e) => tracing::debug!("Skipping dataset summary: {e:#}"),
        }

        // ── Step 2: Load, encode, split ───────────────────────────────────────
        let splits = prepare_splits(cfg)?;
        tracing::info!("Split: {} train, {} test", splits.train.len(), splits.test.len());

        // ── Step 3: Fit ───────────────────────────────────────────────────────
        let model = fit(&splits.train, &cfg.fit_config())?;

        // ── Step 4: Persist ───────────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.model_path);
        store.save(&model)?;

        // ── Step 5: Held-out metrics ──────────────────────────────────────────
        let predictor    = Predictor::new(model.clone());
        let predictions  = predictor.predict_rows(&splits.test.features);
        let test_metrics = RegressionMetrics::compute(&splits.test.targets, &predictions)?;
        tracing::info!(
            "Test metrics: MAE={:.3} RMSE={:.3} R²={:.3}",
            test_metrics.mae, test_metrics.rmse, test_metrics.r2
        );

        // ── Step 6: Run log ───────────────────────────────────────────────────
        MetricsLogger::new(&cfg.metrics_path)?.log("train", &test_metrics)?;

        Ok(TrainReport {
            model,
            train_rows: splits.train.len(),
            test_rows:  splits.test.len(),
            test_metrics,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::{fmt::Write as _, path::Path};

    /// Noise-free `score = 30 + 5h + offset(difficulty)` CSV plus a config
    /// that writes everything under `dir`.
    pub(crate) fn fixture(dir: &Path) -> AppConfig {
        let mut csv = String::from("hours_studied,exam_difficulty,score\n");
        for i in 0..40 {
            let hours = (i % 10) as f64 * 0.9 + 0.3;
            let (name, offset) = match i % 3 {
                0 => ("Easy", 10.0),
                1 => ("Medium", 0.0),
                _ => ("Hard", -10.0),
            };
            writeln!(csv, "{hours},{name},{}", 30.0 + 5.0 * hours + offset).unwrap();
        }
        let data_path = dir.join("scores.csv");
        std::fs::write(&data_path, csv).unwrap();

        AppConfig {
            data_path,
            model_path: dir.join("models/model"),
            metrics_path: dir.join("models/metrics.csv"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_train_writes_artifact_and_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());

        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(report.train_rows, 32);
        assert_eq!(report.test_rows, 8);
        assert!(report.test_metrics.r2 > 0.999);
        assert!(report.test_metrics.mae < 1e-3);

        assert!(ArtifactStore::new(&cfg.model_path).exists());
        let log = std::fs::read_to_string(&cfg.metrics_path).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn test_train_fails_without_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig {
            data_path: dir.path().join("missing.csv"),
            ..AppConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("Dataset not found"));
    }
}
