//! Gradient boosting regressor
//!
//! Least-squares boosting: start from the target mean, then repeatedly fit a
//! shallow regression tree to the current residuals and add its shrunken
//! predictions to the ensemble. Rows can be subsampled per iteration
//! (stochastic gradient boosting).

use super::tree::{RegressionTree, TreeConfig};
use super::{ModelError, Regressor};
use crate::data::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Gradient boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmParams {
    /// Number of boosting iterations (trees)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required in each leaf
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn (without replacement) per iteration
    pub subsample: f64,
    /// Random seed for row subsampling
    pub seed: u64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 10,
            min_samples_leaf: 5,
            subsample: 1.0,
            seed: 42,
        }
    }
}

impl fmt::Display for GbmParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n_estimators={}, learning_rate={}, max_depth={}, subsample={}",
            self.n_estimators, self.learning_rate, self.max_depth, self.subsample
        )
    }
}

/// Gradient boosting regressor over [`RegressionTree`] base learners
#[derive(Debug, Clone)]
pub struct GbmRegressor {
    params: GbmParams,
    init: Option<f64>,
    trees: Vec<RegressionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl GbmRegressor {
    /// Create a regressor with default parameters
    pub fn new() -> Self {
        Self::with_params(GbmParams::default())
    }

    pub fn with_params(params: GbmParams) -> Self {
        Self {
            params,
            init: None,
            trees: Vec::new(),
            feature_names: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn params(&self) -> &GbmParams {
        &self.params
    }

    pub fn is_trained(&self) -> bool {
        self.init.is_some()
    }

    /// Gain-weighted importance summed over all trees, normalized to 1
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    /// (name, importance) pairs in feature order
    pub fn feature_importance_map(&self) -> Vec<(&str, f64)> {
        self.feature_names
            .iter()
            .zip(self.feature_importances.iter())
            .map(|(name, &importance)| (name.as_str(), importance))
            .collect()
    }

    fn tree_config(&self, iteration: usize) -> TreeConfig {
        TreeConfig {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            min_samples_leaf: self.params.min_samples_leaf,
            max_features: None,
            seed: self.params.seed.wrapping_add(iteration as u64),
        }
    }
}

impl Default for GbmRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for GbmRegressor {
    fn fit(&mut self, dataset: &Dataset) -> Result<(), ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::EmptyData);
        }
        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();

        debug!(
            "Training GBM ({}) on {} samples x {} features",
            self.params, n_samples, n_features
        );

        let init = dataset.targets.iter().sum::<f64>() / n_samples as f64;
        let mut predictions = vec![init; n_samples];
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        let mut importances = vec![0.0; n_features];

        let subsample = self.params.subsample.clamp(0.0, 1.0);
        let sample_size = ((subsample * n_samples as f64).round() as usize).clamp(1, n_samples);
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let mut all_rows: Vec<usize> = (0..n_samples).collect();

        for iteration in 0..self.params.n_estimators {
            let residuals: Vec<f64> = dataset
                .targets
                .iter()
                .zip(predictions.iter())
                .map(|(target, prediction)| target - prediction)
                .collect();

            let indices: Vec<usize> = if sample_size < n_samples {
                all_rows.shuffle(&mut rng);
                all_rows[..sample_size].to_vec()
            } else {
                all_rows.clone()
            };

            let mut tree = RegressionTree::new(self.tree_config(iteration));
            tree.fit_indices(&dataset.features, &residuals, &indices)?;

            for (prediction, row) in predictions.iter_mut().zip(dataset.features.iter()) {
                *prediction += self.params.learning_rate * tree.predict_row(row)?;
            }
            for (total, importance) in importances.iter_mut().zip(tree.feature_importances()) {
                *total += importance;
            }
            trees.push(tree);
        }

        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for importance in &mut importances {
                *importance /= sum;
            }
        }

        self.init = Some(init);
        self.trees = trees;
        self.feature_names = dataset.feature_names.clone();
        self.feature_importances = importances;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let init = self.init.ok_or(ModelError::NotTrained)?;
        features
            .iter()
            .map(|row| {
                let mut prediction = init;
                for tree in &self.trees {
                    prediction += self.params.learning_rate * tree.predict_row(row)?;
                }
                Ok(prediction)
            })
            .collect()
    }
}
