// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the headered dataset CSV:
//
//   hours_studied,exam_difficulty,score
//   4.37,Easy,60.2
//   9.56,Medium,100.0
//
// Cells are kept as strings in a `Table`. Typing happens later,
// in the encoder, because which columns are features is a
// config choice. `CsvLoader` also implements RecordSource for
// the fixed three-column schema, used for the dataset summary.
//
// Difficulty cells are matched case-insensitively after trimming,
// so `hard`, ` HARD ` and `Hard` are all kept as Hard. Only names
// outside Easy/Medium/Hard make a row invalid.

use anyhow::{bail, Context, Result};
use std::{
    collections::BTreeMap,
    path::PathBuf,
};

use crate::data::encoder::{DIFFICULTY_COLUMN, HOURS_COLUMN};
use crate::domain::record::{Difficulty, StudentRecord};
use crate::domain::traits::RecordSource;

pub const SCORE_COLUMN: &str = "score";

/// A headered CSV held as raw string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows:    Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Fail with the full list of missing and available columns.
    pub fn require_columns<S: AsRef<str>>(&self, required: &[S]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| self.column_index(c).is_none())
            .collect();

        if !missing.is_empty() {
            bail!(
                "Missing required columns: {}. Available columns: {:?}",
                missing.join(", "),
                self.headers
            );
        }
        Ok(())
    }
}

pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load_table(&self) -> Result<Table> {
        if !self.path.exists() {
            bail!("Dataset not found at: {}", self.path.display());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", self.path.display()))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("Malformed CSV row {} in '{}'", line + 2, self.path.display())
            })?;
            rows.push(record.iter().map(String::from).collect());
        }

        if rows.is_empty() {
            bail!("Loaded dataset is empty.");
        }

        tracing::info!("Loaded {} rows from '{}'", rows.len(), self.path.display());
        Ok(Table::new(headers, rows))
    }
}

impl RecordSource for CsvLoader {
    /// Typed rows for the fixed schema. Rows that fail to parse are skipped.
    fn load_records(&self) -> Result<Vec<StudentRecord>> {
        let table = self.load_table()?;
        table.require_columns(&[HOURS_COLUMN, DIFFICULTY_COLUMN, SCORE_COLUMN])?;

        // require_columns guarantees the lookups below succeed
        let idx = |name: &str| table.column_index(name).unwrap_or_default();
        let (h, d, s) = (idx(HOURS_COLUMN), idx(DIFFICULTY_COLUMN), idx(SCORE_COLUMN));

        let mut records = Vec::with_capacity(table.len());
        for (i, row) in table.rows.iter().enumerate() {
            let parsed = (|| -> Option<StudentRecord> {
                let hours      = row.get(h)?.parse::<f64>().ok().filter(|v| v.is_finite())?;
                let difficulty = row.get(d)?.parse::<Difficulty>().ok()?;
                let score      = row.get(s)?.parse::<f64>().ok().filter(|v| v.is_finite())?;
                Some(StudentRecord::new(hours, difficulty, score))
            })();

            match parsed {
                Some(record) => records.push(record),
                None => tracing::debug!("Skipping unparseable row {}: {:?}", i + 2, row),
            }
        }
        Ok(records)
    }
}

/// Quick sanity statistics over typed records.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows:                usize,
    pub per_difficulty:      BTreeMap<String, usize>,
    pub mean_hours:          f64,
    pub mean_score:          f64,
    pub out_of_range_scores: usize,
}

pub fn summarize(records: &[StudentRecord]) -> DatasetSummary {
    let rows = records.len();
    let mut per_difficulty = BTreeMap::new();
    for r in records {
        *per_difficulty.entry(r.exam_difficulty.to_string()).or_insert(0) += 1;
    }

    let mean = |f: fn(&StudentRecord) -> f64| {
        if rows == 0 { 0.0 } else { records.iter().map(f).sum::<f64>() / rows as f64 }
    };

    DatasetSummary {
        rows,
        per_difficulty,
        mean_hours:          mean(|r| r.hours_studied),
        mean_score:          mean(|r| r.score),
        out_of_range_scores: records.iter().filter(|r| !r.has_valid_score()).count(),
    }
}
