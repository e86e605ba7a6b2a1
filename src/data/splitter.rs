// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles row indices with a seeded RNG and carves off the test
// set. The seed comes from config (`random_state`), so `train`
// and `evaluate` see exactly the same partition.
//
//   test rows  = ceil(n * test_size)
//   train rows = n - test rows
//
// Uses Fisher-Yates via rand::seq::SliceRandom on a StdRng.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::{DatasetSplits, EncodedDataset};

pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Shuffle `0..n` deterministically for `seed`.
pub fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// Split `dataset` into train and test partitions.
///
/// # Errors
/// `test_size` outside (0, 1), or a dataset too small to leave at
/// least one row on each side.
pub fn split_train_test(dataset: &EncodedDataset, test_size: f64, seed: u64) -> Result<DatasetSplits> {
    if !(test_size > 0.0 && test_size < 1.0) {
        bail!("test_size must be in (0, 1), got {test_size}");
    }

    let total  = dataset.len();
    let n_test = ((total as f64) * test_size).ceil() as usize;
    if n_test == 0 || n_test >= total {
        bail!(
            "Cannot split {total} rows with test_size={test_size}: \
             both train and test sets need at least one row"
        );
    }

    let indices = shuffled_indices(total, seed);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let splits = DatasetSplits {
        train: dataset.select(train_idx),
        test:  dataset.select(test_idx),
    };

    tracing::debug!(
        "Dataset split: {} train, {} test (seed={})",
        splits.train.len(),
        splits.test.len(),
        seed,
    );
    Ok(splits)
}
