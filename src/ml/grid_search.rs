//! Exhaustive grid search over gradient-boosting hyperparameters

use super::cross_validation::{cross_val_rmse, CvSplit};
use crate::data::Dataset;
use crate::models::{GbmParams, GbmRegressor, ModelError};
use rayon::prelude::*;
use tracing::{debug, info};

/// Hyperparameter grid for the gradient boosting regressor
///
/// The default grid is 2 x 3 x 3 x 2 = 36 combinations, enumerated in
/// nested-loop order over the fields as declared.
#[derive(Debug, Clone)]
pub struct GbmGrid {
    pub n_estimators: Vec<usize>,
    pub learning_rate: Vec<f64>,
    pub max_depth: Vec<usize>,
    pub subsample: Vec<f64>,
}

impl Default for GbmGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![100, 200],
            learning_rate: vec![0.05, 0.1, 0.15],
            max_depth: vec![3, 4, 5],
            subsample: vec![0.8, 1.0],
        }
    }
}

impl GbmGrid {
    /// All parameter combinations, starting from `base` for the fields the
    /// grid does not vary
    pub fn combinations(&self, base: &GbmParams) -> Vec<GbmParams> {
        let mut combos = Vec::with_capacity(
            self.n_estimators.len()
                * self.learning_rate.len()
                * self.max_depth.len()
                * self.subsample.len(),
        );
        for &n_estimators in &self.n_estimators {
            for &learning_rate in &self.learning_rate {
                for &max_depth in &self.max_depth {
                    for &subsample in &self.subsample {
                        combos.push(GbmParams {
                            n_estimators,
                            learning_rate,
                            max_depth,
                            subsample,
                            ..base.clone()
                        });
                    }
                }
            }
        }
        combos
    }
}

/// Outcome of a grid search
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub best_params: GbmParams,
    pub best_score: f64,
    /// Every evaluated (params, mean RMSE) pair in enumeration order
    pub evaluated: Vec<(GbmParams, f64)>,
}

/// Score every grid combination by mean cross-validated RMSE
///
/// Combinations are evaluated in parallel; every combination is scored on
/// the same fold assignment. The winner is the lowest mean RMSE, ties broken
/// by enumeration order.
pub fn grid_search(
    dataset: &Dataset,
    grid: &GbmGrid,
    splits: &[CvSplit],
) -> Result<GridSearchResult, ModelError> {
    let combos = grid.combinations(&GbmParams::default());
    if combos.is_empty() {
        return Err(ModelError::EmptyData);
    }
    info!(
        "Grid search: {} combinations x {} folds",
        combos.len(),
        splits.len()
    );

    let evaluated: Result<Vec<(GbmParams, f64)>, ModelError> = combos
        .into_par_iter()
        .map(|params| {
            let scores =
                cross_val_rmse(dataset, splits, || GbmRegressor::with_params(params.clone()))?;
            debug!("{} -> RMSE {:.4}", params, scores.mean);
            Ok((params, scores.mean))
        })
        .collect();
    let evaluated = evaluated?;

    let mut best: Option<(GbmParams, f64)> = None;
    for (params, score) in &evaluated {
        if score.is_nan() {
            continue;
        }
        if best.as_ref().map_or(true, |(_, current)| score < current) {
            best = Some((params.clone(), *score));
        }
    }
    let (best_params, best_score) = best.ok_or(ModelError::EmptyData)?;

    info!("Best parameters: {} (RMSE {:.4})", best_params, best_score);
    Ok(GridSearchResult {
        best_params,
        best_score,
        evaluated,
    })
}
