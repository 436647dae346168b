//! Random forest regressor: bagged regression trees with feature subsampling

use super::tree::{RegressionTree, TreeConfig};
use super::{ModelError, Regressor};
use crate::data::Dataset;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each leaf
    pub min_samples_leaf: usize,
    /// Features per split (None = sqrt of total)
    pub max_features: Option<usize>,
    /// Bootstrap row sampling
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random forest regressor
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForestRegressor {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Averaged, re-normalized importance over all trees
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    fn tree_config(&self, n_features: usize, tree_index: usize) -> TreeConfig {
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .max(1);
        TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(max_features.min(n_features)),
            seed: self.config.seed.wrapping_add(tree_index as u64),
        }
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, dataset: &Dataset) -> Result<(), ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::EmptyData);
        }
        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();

        debug!(
            "Training random forest: {} trees on {} samples x {} features",
            self.config.n_trees, n_samples, n_features
        );

        let trees: Result<Vec<RegressionTree>, ModelError> = (0..self.config.n_trees)
            .into_par_iter()
            .map(|t| {
                let indices: Vec<usize> = if self.config.bootstrap {
                    let mut rng =
                        ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(t as u64));
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };

                let mut tree = RegressionTree::new(self.tree_config(n_features, t));
                tree.fit_indices(&dataset.features, &dataset.targets, &indices)?;
                Ok(tree)
            })
            .collect();
        let trees = trees?;

        let mut importances = vec![0.0; n_features];
        for tree in &trees {
            for (total, importance) in importances.iter_mut().zip(tree.feature_importances()) {
                *total += importance;
            }
        }
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for importance in &mut importances {
                *importance /= sum;
            }
        }

        self.trees = trees;
        self.feature_importances = importances;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotTrained);
        }
        features
            .iter()
            .map(|row| {
                let sum: Result<f64, ModelError> = self
                    .trees
                    .iter()
                    .map(|tree| tree.predict_row(row))
                    .sum();
                Ok(sum? / self.trees.len() as f64)
            })
            .collect()
    }
}
