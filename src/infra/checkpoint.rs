// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists a fitted LinearModel as two files next to each other:
//
//   models/
//     model.mpk.gz      ← ScoreRegressor record (burn, full precision)
//     model.meta.json   ← ArtifactMeta: feature order, solver, provenance
//
// `model_path` is given without an extension; burn's file
// recorder appends `.mpk.gz` itself. The metadata is needed to
// rebuild a module of the right width before loading weights
// into it, and to restore the feature order for inference.

use anyhow::{bail, Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    module::Module,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::model::{LinearModel, Solver, MODEL_TYPE};
use crate::ml::model::{ScoreRegressor, ScoreRegressorConfig};

// f64 end to end, so a load returns exactly the weights that were saved
type RecordBackend = NdArray<f64>;
type ModelRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Always `LinearRegression`; anything else is refused on load
    pub model_type:    String,
    /// Feature order the stored weights follow
    pub feature_names: Vec<String>,
    pub solver:        Solver,
    pub trained_rows:  usize,
    /// `CARGO_PKG_VERSION` of the binary that trained the model
    pub crate_version: String,
    pub trained_at:    DateTime<Utc>,
}

pub struct ArtifactStore {
    model_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self { model_path: model_path.into() }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn record_path(&self) -> PathBuf {
        self.model_path.with_extension("mpk.gz")
    }

    pub fn meta_path(&self) -> PathBuf {
        self.model_path.with_extension("meta.json")
    }

    pub fn exists(&self) -> bool {
        self.record_path().exists() && self.meta_path().exists()
    }

    pub fn save(&self, model: &LinearModel) -> Result<()> {
        if let Some(parent) = self.model_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let device = NdArrayDevice::default();
        ScoreRegressor::<RecordBackend>::from_linear_model(model, &device)
            .save_file(self.model_path.clone(), &ModelRecorder::new())
            .with_context(|| format!("Failed to save model to '{}'", self.record_path().display()))?;

        let meta = ArtifactMeta {
            model_type:    MODEL_TYPE.to_string(),
            feature_names: model.feature_names.clone(),
            solver:        model.solver,
            trained_rows:  model.trained_rows,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at:    Utc::now(),
        };
        let meta_path = self.meta_path();
        fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)
            .with_context(|| format!("Cannot write '{}'", meta_path.display()))?;

        tracing::info!("Saved model to '{}'", self.record_path().display());
        Ok(())
    }

    pub fn load_meta(&self) -> Result<ArtifactMeta> {
        let path = self.meta_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Have you run 'train' first?", path.display())
        })?;
        serde_json::from_str(&json).with_context(|| format!("Corrupt metadata in '{}'", path.display()))
    }

    pub fn load(&self) -> Result<LinearModel> {
        let meta = self.load_meta()?;
        if meta.model_type != MODEL_TYPE {
            bail!("Unsupported model type '{}' in '{}'", meta.model_type, self.meta_path().display());
        }

        let device = NdArrayDevice::default();
        let module = ScoreRegressorConfig::new(meta.feature_names.len())
            .init::<RecordBackend>(&device)
            .load_file(self.model_path.clone(), &ModelRecorder::new(), &device)
            .with_context(|| {
                format!(
                    "Cannot load model '{}'. Have you run 'train' first?",
                    self.record_path().display()
                )
            })?;

        let (coefficients, intercept) = module.parameters()?;
        if coefficients.len() != meta.feature_names.len() {
            bail!(
                "Model has {} weights but metadata lists {} features",
                coefficients.len(),
                meta.feature_names.len()
            );
        }

        Ok(LinearModel {
            feature_names: meta.feature_names,
            coefficients,
            intercept,
            solver:        meta.solver,
            trained_rows:  meta.trained_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel {
            feature_names: vec!["hours_studied".into(), "difficulty_Easy".into()],
            coefficients:  vec![5.123456789012, 10.987654321098],
            intercept:     30.111111111111,
            solver:        Solver::LeastSquares,
            trained_rows:  12,
        }
    }

    #[test]
    fn test_paths_derived_from_model_path() {
        let store = ArtifactStore::new("models/model");
        assert_eq!(store.record_path(), PathBuf::from("models/model.mpk.gz"));
        assert_eq!(store.meta_path(), PathBuf::from("models/model.meta.json"));
    }

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested/model"));
        assert!(!store.exists());

        store.save(&model()).unwrap();
        assert!(store.exists());

        // weights come back bit for bit, so predictions do too
        let loaded = store.load().unwrap();
        assert_eq!(loaded, model());
        assert_eq!(loaded.predict_row(&[7.3, 1.0]), model().predict_row(&[7.3, 1.0]));
    }

    #[test]
    fn test_meta_records_provenance() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model"));
        store.save(&model()).unwrap();
        let meta = store.load_meta().unwrap();
        assert_eq!(meta.model_type, "LinearRegression");
        assert_eq!(meta.crate_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactStore::new(dir.path().join("model")).load().unwrap_err();
        assert!(err.to_string().contains("Have you run 'train' first?"));
    }
}
