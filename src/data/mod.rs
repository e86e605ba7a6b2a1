// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From a CSV file on disk to train/test design matrices:
//
//   dataset.csv
//       │
//       ▼
//   CsvLoader        → reads rows as string cells
//       │
//       ▼
//   FeatureEncoder   → numeric columns + one-hot difficulty
//       │
//       ▼
//   split_train_test → seeded shuffle, ceil(n * test_size) test rows
//       │
//       ▼
//   DatasetSplits    → handed to ml::trainer / evaluation

/// Reads the dataset CSV
pub mod loader;

/// One-hot encodes difficulty and builds the design matrix
pub mod encoder;

/// Encoded dataset and split containers
pub mod dataset;

/// Seeded train/test splitting
pub mod splitter;
