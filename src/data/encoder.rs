// ============================================================
// Layer 4 — Feature Encoder
// ============================================================
// Turns string cells into a numeric design matrix.
//
//   hours_studied  exam_difficulty        hours_studied  difficulty_Easy  difficulty_Medium  difficulty_Hard
//   4.37           Easy             →     4.37           1.0              0.0                0.0
//   7.59           Hard                   7.59           0.0              0.0                1.0
//
// Numeric columns pass through as f64. The difficulty column is
// expanded in place into three indicator columns, always in
// Easy/Medium/Hard order so training and inference agree.
// Rows with any unparseable cell are dropped, not imputed.

use anyhow::{bail, Result};

use crate::data::{dataset::EncodedDataset, loader::Table};
use crate::domain::record::Difficulty;

pub const HOURS_COLUMN: &str = "hours_studied";
pub const DIFFICULTY_COLUMN: &str = "exam_difficulty";

pub fn default_feature_columns() -> Vec<String> {
    vec![HOURS_COLUMN.to_string(), DIFFICULTY_COLUMN.to_string()]
}

pub struct FeatureEncoder {
    feature_columns: Vec<String>,
    target_column:   String,
}

impl FeatureEncoder {
    pub fn new(feature_columns: Vec<String>, target_column: impl Into<String>) -> Self {
        Self { feature_columns, target_column: target_column.into() }
    }

    /// Encoded column names for the configured feature columns.
    pub fn feature_names(&self) -> Vec<String> {
        self.feature_columns
            .iter()
            .flat_map(|col| {
                if col == DIFFICULTY_COLUMN {
                    Difficulty::ALL.iter().map(|d| d.column_name()).collect()
                } else {
                    vec![col.clone()]
                }
            })
            .collect()
    }

    pub fn encode(&self, table: &Table) -> Result<EncodedDataset> {
        if self.feature_columns.is_empty() {
            bail!("At least one feature column is required");
        }

        let mut required = self.feature_columns.clone();
        required.push(self.target_column.clone());
        table.require_columns(&required)?;

        // require_columns guarantees every lookup succeeds
        let feature_idx: Vec<(usize, bool)> = self
            .feature_columns
            .iter()
            .map(|c| (table.column_index(c).unwrap_or_default(), c == DIFFICULTY_COLUMN))
            .collect();
        let target_idx = table.column_index(&self.target_column).unwrap_or_default();

        let feature_names = self.feature_names();
        let mut features  = Vec::with_capacity(table.len());
        let mut targets   = Vec::with_capacity(table.len());
        let mut dropped   = 0usize;

        for row in &table.rows {
            match encode_table_row(row, &feature_idx, target_idx, feature_names.len()) {
                Some((x, y)) => {
                    features.push(x);
                    targets.push(y);
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!("Dropped {} of {} rows with invalid values", dropped, table.len());
        }
        if targets.is_empty() {
            bail!("No valid rows remain after encoding");
        }

        tracing::debug!("Encoded {} rows into {} features: {:?}", targets.len(), feature_names.len(), feature_names);
        Ok(EncodedDataset::new(feature_names, features, targets))
    }
}

fn encode_table_row(
    row:         &[String],
    feature_idx: &[(usize, bool)],
    target_idx:  usize,
    width:       usize,
) -> Option<(Vec<f64>, f64)> {
    let mut x = Vec::with_capacity(width);

    for &(idx, is_difficulty) in feature_idx {
        let cell = row.get(idx)?;
        if is_difficulty {
            let difficulty = cell.parse::<Difficulty>().ok()?;
            x.extend(one_hot(difficulty));
        } else {
            x.push(parse_number(cell)?);
        }
    }

    let y = parse_number(row.get(target_idx)?)?;
    Some((x, y))
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn one_hot(difficulty: Difficulty) -> [f64; 3] {
    Difficulty::ALL.map(|d| if d == difficulty { 1.0 } else { 0.0 })
}

/// Build one inference row aligned to a trained model's feature order.
/// Names the request cannot supply are filled with 0.0.
pub fn encode_row(feature_names: &[String], hours: f64, difficulty: Difficulty) -> Vec<f64> {
    let indicator = difficulty.column_name();
    feature_names
        .iter()
        .map(|name| {
            if name == HOURS_COLUMN {
                hours
            } else if name == &indicator {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}
