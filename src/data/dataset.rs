//! Numeric design matrix handed to the regression models

use serde::{Deserialize, Serialize};

/// Fully numeric dataset with named feature columns
///
/// `targets` is empty for the test-side dataset; the processed test matrix
/// shares the train matrix's feature names and ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Feature names, one per column of `features`
    pub feature_names: Vec<String>,
    /// Feature matrix (n_samples x n_features, row-major)
    pub features: Vec<Vec<f64>>,
    /// Regression targets (log-transformed sale prices on the train side)
    pub targets: Vec<f64>,
}

impl Dataset {
    /// Create a dataset from raw parts
    pub fn new(feature_names: Vec<String>, features: Vec<Vec<f64>>, targets: Vec<f64>) -> Self {
        Self {
            feature_names,
            features,
            targets,
        }
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Number of features
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Copy of the rows at the given indices, in the given order
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: if self.targets.is_empty() {
                Vec::new()
            } else {
                indices.iter().map(|&i| self.targets[i]).collect()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_preserves_order() {
        let dataset = Dataset::new(
            vec!["x".to_string()],
            vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]],
            vec![10.0, 11.0, 12.0, 13.0],
        );

        let subset = dataset.select(&[3, 1]);
        assert_eq!(subset.features, vec![vec![3.0], vec![1.0]]);
        assert_eq!(subset.targets, vec![13.0, 11.0]);
        assert_eq!(subset.n_features(), 1);
    }

    #[test]
    fn test_select_with_empty_targets() {
        let dataset = Dataset::new(vec!["x".to_string()], vec![vec![0.0], vec![1.0]], Vec::new());
        let subset = dataset.select(&[1]);
        assert!(subset.targets.is_empty());
        assert_eq!(subset.n_samples(), 1);
    }
}
