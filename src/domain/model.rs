// ============================================================
// Layer 3 — LinearModel Domain Type
// ============================================================
// The result of a fit: one weight per encoded feature plus an
// intercept. This is what gets persisted, loaded by the server
// and reported by /model_info.
//
//   score = intercept + Σ coefficients[i] * features[i]
//
// `feature_names` fixes the column order. Inference rows must be
// built in the same order (see data::encoder::encode_row).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MODEL_TYPE: &str = "LinearRegression";

/// How the coefficients were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Solver {
    /// Closed-form ordinary least squares.
    #[default]
    LeastSquares,
    /// Full-batch Adam on mean squared error.
    GradientDescent,
}

impl Solver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Solver::LeastSquares    => "least_squares",
            Solver::GradientDescent => "gradient_descent",
        }
    }
}

/// A fitted `score = intercept + Σ coefficients[i] · x[i]` model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Encoded column names, in the order the coefficients follow
    pub feature_names: Vec<String>,
    /// One weight per entry in `feature_names`
    pub coefficients:  Vec<f64>,
    /// Bias term
    pub intercept:     f64,
    /// Solver that produced the weights
    pub solver:        Solver,
    /// Rows in the training split
    pub trained_rows:  usize,
}

impl LinearModel {
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Raw linear response for one encoded row (no clamping).
    ///
    /// Rows shorter than the model are treated as zero-padded.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// Coefficients keyed by feature name, for reporting.
    pub fn coefficient_map(&self) -> BTreeMap<String, f64> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.coefficients.iter().copied())
            .collect()
    }
}

/// What /model_info reports about a loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type:    String,
    pub feature_names: Vec<String>,
    pub coefficients:  BTreeMap<String, f64>,
    pub intercept:     f64,
    pub solver:        Solver,
    pub trained_rows:  usize,
}

impl From<&LinearModel> for ModelInfo {
    fn from(model: &LinearModel) -> Self {
        Self {
            model_type:    MODEL_TYPE.to_string(),
            feature_names: model.feature_names.clone(),
            coefficients:  model.coefficient_map(),
            intercept:     model.intercept,
            solver:        model.solver,
            trained_rows:  model.trained_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel {
            feature_names: vec!["hours_studied".into(), "difficulty_Easy".into()],
            coefficients:  vec![5.0, 10.0],
            intercept:     20.0,
            solver:        Solver::LeastSquares,
            trained_rows:  10,
        }
    }

    #[test]
    fn test_predict_row() {
        assert_eq!(model().predict_row(&[2.0, 1.0]), 40.0);
        assert_eq!(model().predict_row(&[2.0, 0.0]), 30.0);
    }

    #[test]
    fn test_coefficient_map() {
        let map = model().coefficient_map();
        assert_eq!(map["hours_studied"], 5.0);
        assert_eq!(map["difficulty_Easy"], 10.0);
    }

    #[test]
    fn test_model_info_from_model() {
        let info = ModelInfo::from(&model());
        assert_eq!(info.model_type, "LinearRegression");
        assert_eq!(info.coefficients.len(), 2);
        assert_eq!(info.intercept, 20.0);
    }

    #[test]
    fn test_solver_serialises_snake_case() {
        let json = serde_json::to_string(&Solver::GradientDescent).unwrap();
        assert_eq!(json, "\"gradient_descent\"");
    }
}
