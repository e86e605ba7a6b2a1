// ============================================================
// Layer 3 — StudentRecord and Difficulty
// ============================================================
// One row of the dataset:
//
//   hours_studied, exam_difficulty, score
//   4.37,          Easy,            60.2
//
// Difficulty is a closed set, so it is an enum rather than a
// string. Every boundary that accepts user input (CSV cells,
// CLI flags, HTTP bodies) goes through `Difficulty::from_str`
// and `validate_hours`, so invalid values never reach the model.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest and highest score an exam can produce.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Rejections for values that come from outside the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid exam_difficulty '{0}'. Must be one of: Easy, Medium, Hard")]
    UnknownDifficulty(String),

    #[error("hours_studied must be a finite, non-negative number (got {0})")]
    InvalidHours(f64),
}

/// Exam difficulty category, one-hot encoded before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All categories in encoding order. The one-hot columns are
    /// emitted in exactly this order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy   => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard   => "Hard",
        }
    }

    /// Name of the indicator column for this category, e.g. `difficulty_Hard`.
    pub fn column_name(&self) -> String {
        format!("difficulty_{}", self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownDifficulty(s.to_string()))
    }
}

/// Accept only finite, non-negative study hours.
pub fn validate_hours(hours: f64) -> Result<f64, ValidationError> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(hours)
    } else {
        Err(ValidationError::InvalidHours(hours))
    }
}

/// A typed dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub hours_studied:   f64,
    pub exam_difficulty: Difficulty,
    pub score:           f64,
}

impl StudentRecord {
    pub fn new(hours_studied: f64, exam_difficulty: Difficulty, score: f64) -> Self {
        Self { hours_studied, exam_difficulty, score }
    }

    /// True when the score lies in the valid exam range.
    pub fn has_valid_score(&self) -> bool {
        (SCORE_MIN..=SCORE_MAX).contains(&self.score)
    }
}
