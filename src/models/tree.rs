//! Regression tree (CART) used standalone and as the boosting base learner

use super::ModelError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Regression tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node; leaves carry the mean target of their samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index for the split (None for leaves)
    pub feature_idx: Option<usize>,
    /// Threshold for the split (None for leaves)
    pub threshold: Option<f64>,
    /// Prediction value
    pub value: f64,
    /// Samples that reached this node during training
    pub n_samples: usize,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(value: f64, n_samples: usize) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            value,
            n_samples,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Candidate split found by the sorted scan
struct Split {
    feature_idx: usize,
    threshold: f64,
    /// Squared-error reduction achieved by the split
    gain: f64,
}

/// Regression tree model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
    feature_importances: Vec<f64>,
}

impl RegressionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            feature_importances: Vec::new(),
        }
    }

    /// Train on all rows of `x`
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        let indices: Vec<usize> = (0..x.len()).collect();
        self.fit_indices(x, y, &indices)
    }

    /// Train on the rows of `x` selected by `indices`
    ///
    /// The forest passes bootstrap samples and the booster passes subsampled
    /// rows without copying the feature matrix.
    pub fn fit_indices(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
    ) -> Result<(), ModelError> {
        if indices.is_empty() || x.is_empty() {
            return Err(ModelError::EmptyData);
        }
        if x.len() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }

        let n_features = x[0].len();
        self.feature_importances = vec![0.0; n_features];

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build_tree(x, y, indices, 0, &mut rng));

        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for importance in &mut self.feature_importances {
                *importance /= total;
            }
        }
        Ok(())
    }

    fn build_tree(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let sum_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let mean = sum / n as f64;
        let sse = sum_sq - sum * sum / n as f64;

        if depth >= self.config.max_depth || n < self.config.min_samples_split || sse <= 1e-12 {
            return TreeNode::leaf(mean, n);
        }

        let features = self.candidate_features(x[0].len(), rng);
        let Some(split) = self.best_split(x, y, indices, &features, sse) else {
            return TreeNode::leaf(mean, n);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[i][split.feature_idx] <= split.threshold);

        self.feature_importances[split.feature_idx] += split.gain;

        let left = self.build_tree(x, y, &left_indices, depth + 1, rng);
        let right = self.build_tree(x, y, &right_indices, depth + 1, rng);

        TreeNode {
            feature_idx: Some(split.feature_idx),
            threshold: Some(split.threshold),
            value: mean,
            n_samples: n,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// Feature indices considered for the next split
    fn candidate_features(&self, n_features: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let mut features: Vec<usize> = (0..n_features).collect();
        if let Some(max_features) = self.config.max_features {
            if max_features < n_features {
                features.shuffle(rng);
                features.truncate(max_features);
            }
        }
        features
    }

    /// Best variance-reduction split over the candidate features
    ///
    /// One sorted scan per feature with running prefix sums, rather than
    /// re-partitioning per candidate threshold.
    fn best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        features: &[usize],
        parent_sse: f64,
    ) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);

        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

        let mut best: Option<Split> = None;
        let mut sorted: Vec<(f64, f64)> = Vec::with_capacity(n);

        for &feature_idx in features {
            sorted.clear();
            sorted.extend(indices.iter().map(|&i| (x[i][feature_idx], y[i])));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for split_at in 1..n {
                let (value, target) = sorted[split_at - 1];
                left_sum += target;
                left_sq += target * target;

                // No threshold separates equal values
                if value == sorted[split_at].0 {
                    continue;
                }
                if split_at < min_leaf || n - split_at < min_leaf {
                    continue;
                }

                let n_left = split_at as f64;
                let n_right = (n - split_at) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;

                let left_sse = left_sq - left_sum * left_sum / n_left;
                let right_sse = right_sq - right_sum * right_sum / n_right;
                let gain = parent_sse - left_sse - right_sse;

                if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                    best = Some(Split {
                        feature_idx,
                        threshold: (value + sorted[split_at].0) / 2.0,
                        gain,
                    });
                }
            }
        }
        best
    }

    /// Predict a single row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        let mut node = self.root.as_ref().ok_or(ModelError::NotTrained)?;
        loop {
            match (node.feature_idx, node.threshold) {
                (Some(feature_idx), Some(threshold)) => {
                    let child = if row[feature_idx] <= threshold {
                        node.left.as_deref()
                    } else {
                        node.right.as_deref()
                    };
                    match child {
                        Some(child) => node = child,
                        None => return Ok(node.value),
                    }
                }
                _ => return Ok(node.value),
            }
        }
    }

    /// Predict every row of `x`
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Per-feature importance, normalized to sum to 1 over used features
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            if node.is_leaf() {
                1
            } else {
                1 + node
                    .left
                    .as_deref()
                    .map(walk)
                    .unwrap_or(0)
                    .max(node.right.as_deref().map(walk).unwrap_or(0))
            }
        }
        self.root.as_ref().map(walk).unwrap_or(0)
    }
}
