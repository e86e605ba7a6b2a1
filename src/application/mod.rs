// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal each. No maths, no
// printing, no direct file formats: only workflow coordination.

// Fit and persist a model
pub mod train_use_case;

// Score a saved model on the held-out split
pub mod evaluate_use_case;

// Predict one row with a saved model
pub mod predict_use_case;

use anyhow::Result;

use crate::data::{
    dataset::DatasetSplits,
    encoder::FeatureEncoder,
    loader::CsvLoader,
    splitter::split_train_test,
};
use crate::infra::config::AppConfig;

/// Load → encode → split, shared by training and evaluation so both
/// see the same partition for the same config.
pub(crate) fn prepare_splits(cfg: &AppConfig) -> Result<DatasetSplits> {
    let table   = CsvLoader::new(&cfg.data_path).load_table()?;
    let encoded = FeatureEncoder::new(cfg.feature_columns(), cfg.target.clone()).encode(&table)?;
    split_train_test(&encoded, cfg.test_size, cfg.random_state)
}
