// ============================================================
// Layer 6 — Configuration
// ============================================================
// All run settings come from one YAML file (configs/config.yaml
// by default). Every key is optional:
//
//   data_path:     datasets/student_scores_dataset.csv
//   test_size:     0.2
//   random_state:  42
//   target:        score
//   feature:       [hours_studied, exam_difficulty]   # or a single name
//   model_path:    models/model
//   metrics_path:  models/metrics.csv
//   solver:        least_squares                      # or gradient_descent
//   epochs:        2000
//   learning_rate: 0.05
//   server:
//     host: 0.0.0.0
//     port: 5000

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::encoder::default_feature_columns;
use crate::data::splitter::{DEFAULT_SEED, DEFAULT_TEST_SIZE};
use crate::domain::model::Solver;
use crate::ml::trainer::FitConfig;

pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

/// `feature:` accepts a single column name or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureSpec {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Headered dataset CSV
    pub data_path:     PathBuf,
    /// Share of rows held out for testing, in (0, 1)
    pub test_size:     f64,
    /// Shuffle seed; train and evaluate must agree on it
    pub random_state:  u64,
    /// Target column
    pub target:        String,
    /// Feature columns; `None` means hours_studied + exam_difficulty
    pub feature:       Option<FeatureSpec>,
    /// Artifact path without extension
    pub model_path:    PathBuf,
    /// Run log CSV
    pub metrics_path:  PathBuf,
    pub solver:        Solver,
    /// Adam steps (gradient_descent only)
    pub epochs:        usize,
    /// Adam step size (gradient_descent only)
    pub learning_rate: f64,
    pub server:        ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fit = FitConfig::default();
        Self {
            data_path:     PathBuf::from("datasets/student_scores_dataset.csv"),
            test_size:     DEFAULT_TEST_SIZE,
            random_state:  DEFAULT_SEED,
            target:        "score".to_string(),
            feature:       None,
            model_path:    PathBuf::from("models/model"),
            metrics_path:  PathBuf::from("models/metrics.csv"),
            solver:        fit.solver,
            epochs:        fit.epochs,
            learning_rate: fit.learning_rate,
            server:        ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("Config not found: {}", path.display());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config '{}'", path.display()))?;
        let cfg = Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid config '{}'", path.display()))?;
        tracing::debug!("Loaded config from '{}': {:?}", path.display(), cfg);
        Ok(cfg)
    }

    /// Parse YAML text. An empty or comment-only document yields defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let blank = text.lines().all(|l| {
            let l = l.trim();
            l.is_empty() || l.starts_with('#')
        });
        let value: serde_yaml::Value = if blank {
            serde_yaml::Value::Null
        } else {
            serde_yaml::from_str(text)?
        };

        let cfg: Self = match value {
            serde_yaml::Value::Null => Self::default(),
            other => serde_yaml::from_value(other)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("test_size must be in (0, 1), got {}", self.test_size);
        }
        if self.target.trim().is_empty() {
            bail!("target must not be empty");
        }
        if self.feature_columns().is_empty() {
            bail!("feature must name at least one column");
        }
        if self.feature_columns().contains(&self.target) {
            bail!("target '{}' cannot also be a feature", self.target);
        }
        Ok(())
    }

    pub fn feature_columns(&self) -> Vec<String> {
        match &self.feature {
            None                        => default_feature_columns(),
            Some(FeatureSpec::One(col)) => vec![col.clone()],
            Some(FeatureSpec::Many(v))  => v.clone(),
        }
    }

    pub fn fit_config(&self) -> FitConfig {
        FitConfig {
            solver:        self.solver,
            epochs:        self.epochs,
            learning_rate: self.learning_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_yaml_str("# nothing\n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let cfg = AppConfig::from_yaml_str("test_size: 0.25\nserver:\n  port: 8080\n").unwrap();
        assert_eq!(cfg.test_size, 0.25);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.random_state, 42);
    }

    #[test]
    fn test_feature_single_or_list() {
        let one = AppConfig::from_yaml_str("feature: hours_studied\n").unwrap();
        assert_eq!(one.feature_columns(), ["hours_studied"]);

        let many = AppConfig::from_yaml_str("feature: [hours_studied, exam_difficulty]\n").unwrap();
        assert_eq!(many.feature_columns(), ["hours_studied", "exam_difficulty"]);

        assert_eq!(AppConfig::default().feature_columns(), default_feature_columns());
    }

    #[test]
    fn test_solver_parses() {
        let cfg = AppConfig::from_yaml_str("solver: gradient_descent\nepochs: 10\n").unwrap();
        assert_eq!(cfg.fit_config().solver, Solver::GradientDescent);
        assert_eq!(cfg.fit_config().epochs, 10);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(AppConfig::from_yaml_str("test_size: 1.5\n").is_err());
        assert!(AppConfig::from_yaml_str("feature: score\n").is_err());
        assert!(AppConfig::from_yaml_str("solver: magic\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("no/such/config.yaml").unwrap_err();
        assert!(err.to_string().contains("Config not found"));
    }

    #[test]
    fn test_load_from_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "model_path: out/m\n").unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.model_path, PathBuf::from("out/m"));
    }
}
