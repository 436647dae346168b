//! Regression models: ridge baseline, random forest, and gradient boosting

pub mod forest;
pub mod gbm;
pub mod linear;
pub mod tree;

pub use forest::{ForestConfig, RandomForestRegressor};
pub use gbm::{GbmParams, GbmRegressor};
pub use linear::RidgeRegression;
pub use tree::{RegressionTree, TreeConfig};

use crate::data::Dataset;
use thiserror::Error;

/// Errors that can occur while fitting or predicting
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Cannot fit on an empty dataset")]
    EmptyData,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Model has not been fitted yet")]
    NotTrained,

    #[error("Matrix is singular and cannot be inverted")]
    SingularMatrix,
}

/// Common interface over the regression models
///
/// Cross-validation and grid search construct fresh models through factory
/// closures and drive them through this trait.
pub trait Regressor {
    /// Fit the model on a dataset with targets
    fn fit(&mut self, dataset: &Dataset) -> Result<(), ModelError>;

    /// Predict one value per feature row
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError>;
}
