use serde::{Deserialize, Serialize};

/// Fully encoded rows ready for fitting.
/// `features[i]` has one value per entry in `feature_names`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedDataset {
    pub feature_names: Vec<String>,
    pub features:      Vec<Vec<f64>>,
    pub targets:       Vec<f64>,
}

impl EncodedDataset {
    pub fn new(feature_names: Vec<String>, features: Vec<Vec<f64>>, targets: Vec<f64>) -> Self {
        Self { feature_names, features, targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Copy out the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features:      indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets:       indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Train/test partition of one encoded dataset.
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    pub train: EncodedDataset,
    pub test:  EncodedDataset,
}
