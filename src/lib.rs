//! House-price regression pipeline
//!
//! Loads the Ames housing train/test CSVs, imputes missing values, engineers
//! derived features, one-hot encodes categoricals, benchmarks three
//! regression models under cross-validation, grid-searches a gradient
//! boosting regressor, and writes a submission file plus a
//! feature-importance chart.
//!
//! # Modules
//!
//! - [`data`] - CSV loading, the mixed-type frame, and the numeric dataset
//! - [`features`] - Imputation, derived features, and one-hot encoding
//! - [`models`] - Ridge, random forest, and gradient boosting regressors
//! - [`ml`] - Metrics, cross-validation, and grid search
//! - [`submission`] - Submission CSV output
//! - [`plot`] - Feature-importance chart rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use house_prices::data::read_csv;
//! use house_prices::features::Preprocessor;
//! use house_prices::models::{GbmRegressor, Regressor};
//!
//! fn main() -> anyhow::Result<()> {
//!     let train = read_csv("data/train.csv")?;
//!     let test = read_csv("data/test.csv")?;
//!
//!     let processed = Preprocessor::new().run(&train, &test)?;
//!
//!     let mut model = GbmRegressor::new();
//!     model.fit(&processed.train)?;
//!     let predictions = model.predict(&processed.test.features)?;
//!     println!("predicted {} prices", predictions.len());
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod features;
pub mod ml;
pub mod models;
pub mod plot;
pub mod submission;

pub use data::{DataFrame, Dataset};
pub use features::{Preprocessor, Processed};
pub use models::{GbmParams, GbmRegressor, Regressor};
