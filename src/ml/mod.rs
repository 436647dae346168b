//! Model evaluation: metrics, cross-validation, and grid search

pub mod cross_validation;
pub mod grid_search;
pub mod metrics;

pub use cross_validation::{cross_val_rmse, CrossValidator, CvScores, CvSplit};
pub use grid_search::{grid_search, GbmGrid, GridSearchResult};
