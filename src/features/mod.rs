//! Preprocessing: imputation, derived features, and one-hot encoding
//!
//! The raw train and test frames are merged so imputation statistics and
//! category sets are computed over both, then split back into aligned
//! numeric datasets.

pub mod encode;
pub mod engineering;
pub mod impute;

pub use engineering::{AGE, REMODEL_AGE, TOTAL_SF};

use crate::data::{Column, DataFrame, Dataset, FrameError};
use thiserror::Error;
use tracing::info;

/// Errors from the preprocessing stage
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("Column '{column}' still contains nulls after imputation")]
    NullsRemain { column: String },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Preprocessing configuration
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Columns with a null fraction above this are dropped
    pub sparse_threshold: f64,
    /// Name of the target column (train frame only)
    pub target: String,
    /// Name of the identifier column
    pub id: String,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            sparse_threshold: 0.5,
            target: "SalePrice".to_string(),
            id: "Id".to_string(),
        }
    }
}

/// Output of the preprocessing stage
#[derive(Debug, Clone)]
pub struct Processed {
    /// Training matrix with log1p-transformed targets
    pub train: Dataset,
    /// Test matrix, column-aligned with `train`, empty targets
    pub test: Dataset,
    /// Test identifiers in row order, for the submission file
    pub test_ids: Vec<i64>,
    /// Names of the columns dropped for sparsity
    pub dropped: Vec<String>,
}

/// Turns the raw train/test frames into aligned numeric datasets
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::with_config(PreprocessConfig::default())
    }

    pub fn with_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Run the full preprocessing pipeline
    ///
    /// Steps: pull target and ids, merge frames, drop sparse columns,
    /// group-aware frontage fill, median/mode imputation, derived features,
    /// one-hot encoding, split back and align.
    pub fn run(
        &self,
        train: &DataFrame,
        test: &DataFrame,
    ) -> Result<Processed, PreprocessError> {
        let mut train = train.clone();
        let mut test = test.clone();

        let targets = self.take_target(&mut train)?;
        train
            .take_column(&self.config.id)
            .map_err(|_| PreprocessError::MissingColumn(self.config.id.clone()))?;
        let test_ids = self.take_ids(&mut test)?;

        let n_train = train.n_rows();
        let mut combined = train.concat(&test)?;

        let dropped = impute::drop_sparse_columns(&mut combined, self.config.sparse_threshold);
        impute::impute_frontage_by_neighborhood(&mut combined);
        impute::impute_medians_and_modes(&mut combined);
        engineering::add_derived_features(&mut combined)?;

        let encoded = encode::one_hot_encode(&combined)?;
        let train_encoded = encoded.slice_rows(0, n_train);
        let test_encoded = encoded.slice_rows(n_train, encoded.n_rows());
        let test_encoded = encode::reindex_columns(&test_encoded, train_encoded.names())?;

        let (feature_names, train_matrix) = encode::to_matrix(&train_encoded)?;
        let (_, test_matrix) = encode::to_matrix(&test_encoded)?;

        let log_targets: Vec<f64> = targets.iter().map(|t| t.ln_1p()).collect();

        info!(
            "Preprocessed {} train / {} test rows into {} features ({} sparse columns dropped)",
            n_train,
            test_matrix.len(),
            feature_names.len(),
            dropped.len()
        );

        Ok(Processed {
            train: Dataset::new(feature_names.clone(), train_matrix, log_targets),
            test: Dataset::new(feature_names, test_matrix, Vec::new()),
            test_ids,
            dropped,
        })
    }

    /// Remove the target column from the train frame as a dense numeric vector
    fn take_target(&self, train: &mut DataFrame) -> Result<Vec<f64>, PreprocessError> {
        let target = train
            .take_column(&self.config.target)
            .map_err(|_| PreprocessError::MissingColumn(self.config.target.clone()))?;
        let Column::Numeric(cells) = target else {
            return Err(PreprocessError::NotNumeric(self.config.target.clone()));
        };
        cells
            .into_iter()
            .map(|cell| {
                cell.ok_or_else(|| PreprocessError::NullsRemain {
                    column: self.config.target.clone(),
                })
            })
            .collect()
    }

    /// Remove the id column from the test frame as integer identifiers
    fn take_ids(&self, test: &mut DataFrame) -> Result<Vec<i64>, PreprocessError> {
        let ids = test
            .take_column(&self.config.id)
            .map_err(|_| PreprocessError::MissingColumn(self.config.id.clone()))?;
        let Column::Numeric(cells) = ids else {
            return Err(PreprocessError::NotNumeric(self.config.id.clone()));
        };
        cells
            .into_iter()
            .map(|cell| {
                cell.map(|v| v as i64)
                    .ok_or_else(|| PreprocessError::NullsRemain {
                        column: self.config.id.clone(),
                    })
            })
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
