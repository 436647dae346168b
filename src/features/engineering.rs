//! Derived feature construction
//!
//! The derived columns combine raw numeric fields and must be computed
//! before one-hot encoding. A missing source column is a hard error; the
//! pipeline does not guess at substitutes.

use super::PreprocessError;
use crate::data::{Column, DataFrame};
use tracing::debug;

/// Total living area: above-ground plus basement square footage
pub const TOTAL_SF: &str = "TotalSF";
/// House age at sale time
pub const AGE: &str = "Age";
/// Years since the last remodel at sale time
pub const REMODEL_AGE: &str = "RemodelAge";

/// Append `TotalSF`, `Age` and `RemodelAge` to the frame
pub fn add_derived_features(frame: &mut DataFrame) -> Result<(), PreprocessError> {
    let total_sf = combine(frame, "GrLivArea", "TotalBsmtSF", |a, b| a + b)?;
    let age = combine(frame, "YrSold", "YearBuilt", |a, b| a - b)?;
    let remodel_age = combine(frame, "YrSold", "YearRemodAdd", |a, b| a - b)?;

    frame.push_column(TOTAL_SF, Column::Numeric(total_sf))?;
    frame.push_column(AGE, Column::Numeric(age))?;
    frame.push_column(REMODEL_AGE, Column::Numeric(remodel_age))?;

    debug!("Added derived columns {TOTAL_SF}, {AGE}, {REMODEL_AGE}");
    Ok(())
}

/// Combine two numeric columns cell-wise; nulls propagate
fn combine(
    frame: &DataFrame,
    left: &str,
    right: &str,
    op: impl Fn(f64, f64) -> f64,
) -> Result<Vec<Option<f64>>, PreprocessError> {
    let left_cells = numeric_cells(frame, left)?;
    let right_cells = numeric_cells(frame, right)?;
    Ok(left_cells
        .iter()
        .zip(right_cells.iter())
        .map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some(op(*a, *b)),
            _ => None,
        })
        .collect())
}

fn numeric_cells<'a>(
    frame: &'a DataFrame,
    name: &str,
) -> Result<&'a [Option<f64>], PreprocessError> {
    match frame.column(name) {
        Some(Column::Numeric(cells)) => Ok(cells),
        Some(Column::Categorical(_)) => Err(PreprocessError::NotNumeric(name.to_string())),
        None => Err(PreprocessError::MissingColumn(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_frame() -> DataFrame {
        let mut frame = DataFrame::new();
        frame
            .push_column("GrLivArea", Column::Numeric(vec![Some(1500.0), Some(900.0)]))
            .unwrap();
        frame
            .push_column("TotalBsmtSF", Column::Numeric(vec![Some(800.0), Some(0.0)]))
            .unwrap();
        frame
            .push_column("YrSold", Column::Numeric(vec![Some(2010.0), Some(2008.0)]))
            .unwrap();
        frame
            .push_column("YearBuilt", Column::Numeric(vec![Some(2000.0), Some(1950.0)]))
            .unwrap();
        frame
            .push_column("YearRemodAdd", Column::Numeric(vec![Some(2005.0), Some(1990.0)]))
            .unwrap();
        frame
    }

    #[test]
    fn test_derived_feature_arithmetic() {
        let mut frame = base_frame();
        add_derived_features(&mut frame).unwrap();

        let Some(Column::Numeric(total_sf)) = frame.column(TOTAL_SF) else {
            panic!()
        };
        let Some(Column::Numeric(age)) = frame.column(AGE) else {
            panic!()
        };
        let Some(Column::Numeric(remodel_age)) = frame.column(REMODEL_AGE) else {
            panic!()
        };

        assert_eq!(total_sf, &vec![Some(2300.0), Some(900.0)]);
        assert_eq!(age, &vec![Some(10.0), Some(58.0)]);
        assert_eq!(remodel_age, &vec![Some(5.0), Some(18.0)]);
    }

    #[test]
    fn test_missing_source_column_fails() {
        let mut frame = base_frame();
        frame.drop_column("GrLivArea");

        let err = add_derived_features(&mut frame).unwrap_err();
        assert!(matches!(err, PreprocessError::MissingColumn(name) if name == "GrLivArea"));
    }

    #[test]
    fn test_categorical_source_column_fails() {
        let mut frame = base_frame();
        frame.drop_column("YrSold");
        frame
            .push_column(
                "YrSold",
                Column::Categorical(vec![Some("2010".to_string()), Some("2008".to_string())]),
            )
            .unwrap();

        let err = add_derived_features(&mut frame).unwrap_err();
        assert!(matches!(err, PreprocessError::NotNumeric(name) if name == "YrSold"));
    }
}
