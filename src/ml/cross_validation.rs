//! K-fold cross-validation for model selection

use super::metrics;
use crate::data::Dataset;
use crate::models::{ModelError, Regressor};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One cross-validation split
#[derive(Debug, Clone)]
pub struct CvSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Cross-validator
pub struct CrossValidator;

impl CrossValidator {
    /// Shuffled k-fold splits, deterministic for a given seed
    ///
    /// The same seed is reused across every grid-search candidate so all
    /// configurations are scored on identical folds.
    pub fn k_fold(n_samples: usize, n_folds: usize, seed: u64) -> Vec<CvSplit> {
        assert!(n_folds > 1, "n_folds must be > 1");
        assert!(n_samples >= n_folds, "n_samples must be >= n_folds");

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let fold_size = n_samples / n_folds;
        let mut splits = Vec::with_capacity(n_folds);

        for fold in 0..n_folds {
            let test_start = fold * fold_size;
            let test_end = if fold == n_folds - 1 {
                n_samples
            } else {
                (fold + 1) * fold_size
            };

            let test_indices: Vec<usize> = indices[test_start..test_end].to_vec();
            let train_indices: Vec<usize> = indices[..test_start]
                .iter()
                .chain(indices[test_end..].iter())
                .copied()
                .collect();

            splits.push(CvSplit {
                train_indices,
                test_indices,
            });
        }
        splits
    }
}

/// Summary statistics over per-fold scores
#[derive(Debug, Clone)]
pub struct CvScores {
    pub scores: Vec<f64>,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl CvScores {
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            scores,
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "mean={:.4} (+/- {:.4}), min={:.4}, max={:.4}",
            self.mean,
            self.std * 2.0,
            self.min,
            self.max
        )
    }
}

/// Fit a fresh model per fold and score RMSE on the held-out fold
pub fn cross_val_rmse<M, F>(
    dataset: &Dataset,
    splits: &[CvSplit],
    factory: F,
) -> Result<CvScores, ModelError>
where
    M: Regressor,
    F: Fn() -> M,
{
    let mut scores = Vec::with_capacity(splits.len());
    for split in splits {
        let train = dataset.select(&split.train_indices);
        let test = dataset.select(&split.test_indices);

        let mut model = factory();
        model.fit(&train)?;
        let predictions = model.predict(&test.features)?;
        scores.push(metrics::rmse(&test.targets, &predictions));
    }
    Ok(CvScores::from_scores(scores))
}
