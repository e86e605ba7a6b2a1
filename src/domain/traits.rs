// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The application layer talks to these abstractions, not to the
// CSV loader or the burn-backed predictor directly.

use anyhow::Result;

use crate::domain::model::ModelInfo;
use crate::domain::record::{Difficulty, StudentRecord};

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that can yield typed student records.
///
/// Implementations:
///   - CsvLoader → reads a headered CSV file
pub trait RecordSource {
    fn load_records(&self) -> Result<Vec<StudentRecord>>;
}

// ─── ScorePredictor ───────────────────────────────────────────────────────────
/// Anything that can predict an exam score for one student.
///
/// Implementations:
///   - Predictor → a fitted linear model loaded from an artifact
pub trait ScorePredictor: Send + Sync {
    fn predict(&self, hours_studied: f64, difficulty: Difficulty) -> Result<f64>;

    /// Description of the underlying model.
    fn info(&self) -> ModelInfo;
}
