// ============================================================
// Layer 6 — Regression Metrics
// ============================================================
// MAE, MSE, RMSE and R² over held-out predictions, plus a CSV
// log with one row per train/evaluate run:
//
//   timestamp,stage,rows,mae,rmse,r2
//   2026-10-14T09:12:03Z,train,20,3.104211,4.012877,0.912034
//   2026-10-14T09:15:40Z,evaluate,20,3.104211,4.012877,0.912034

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// Error summary of one prediction set against its targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Number of scored rows
    pub rows: usize,
    /// Mean absolute error, in score points
    pub mae:  f64,
    /// Mean squared error
    pub mse:  f64,
    /// Square root of `mse`, in score points
    pub rmse: f64,
    /// Coefficient of determination (1.0 = perfect fit)
    pub r2:   f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self> {
        if y_true.is_empty() {
            bail!("Cannot compute metrics on an empty set");
        }
        if y_true.len() != y_pred.len() {
            bail!("Length mismatch: {} targets vs {} predictions", y_true.len(), y_pred.len());
        }

        let n = y_true.len() as f64;
        let residuals: Vec<f64> = y_true.iter().zip(y_pred).map(|(t, p)| t - p).collect();

        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;
        let sse = residuals.iter().map(|r| r * r).sum::<f64>();
        let mse = sse / n;

        let mean = y_true.iter().sum::<f64>() / n;
        let sst  = y_true.iter().map(|t| (t - mean).powi(2)).sum::<f64>();
        // constant target: perfect predictions score 1, anything else 0
        let r2 = if sst == 0.0 {
            if sse == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - sse / sst
        };

        Ok(Self { rows: y_true.len(), mae, mse, rmse: mse.sqrt(), r2 })
    }
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Creates the parent directory and writes the header if the file is new.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();
        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "timestamp,stage,rows,mae,rmse,r2")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }
        Ok(Self { csv_path })
    }

    pub fn log(&self, stage: &str, m: &RegressionMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{},{:.6},{:.6},{:.6}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            stage,
            m.rows,
            m.mae,
            m.rmse,
            m.r2,
        )?;
        tracing::info!("Appended {} metrics to '{}'", stage, self.csv_path().display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let y = [10.0, 20.0, 30.0];
        let m = RegressionMetrics::compute(&y, &y).unwrap();
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.r2, 1.0);
    }

    #[test]
    fn test_known_values() {
        let m = RegressionMetrics::compute(&[1.0, 2.0, 3.0, 4.0], &[2.0, 2.0, 3.0, 2.0]).unwrap();
        // residuals -1, 0, 0, 2
        assert!((m.mae - 0.75).abs() < 1e-12);
        assert!((m.mse - 1.25).abs() < 1e-12);
        assert!((m.rmse - 1.25f64.sqrt()).abs() < 1e-12);
        // sst = 5, sse = 5
        assert!(m.r2.abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        assert_eq!(RegressionMetrics::compute(&[5.0, 5.0], &[5.0, 5.0]).unwrap().r2, 1.0);
        assert_eq!(RegressionMetrics::compute(&[5.0, 5.0], &[4.0, 6.0]).unwrap().r2, 0.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(RegressionMetrics::compute(&[], &[]).is_err());
        assert!(RegressionMetrics::compute(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_logger_appends_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().join("runs/metrics.csv")).unwrap();
        let m      = RegressionMetrics::compute(&[1.0, 2.0], &[1.0, 2.5]).unwrap();
        logger.log("train", &m).unwrap();
        logger.log("evaluate", &m).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,stage,rows,mae,rmse,r2");
        assert!(lines[1].contains(",train,2,"));
        assert!(lines[2].contains(",evaluate,2,"));
    }
}
