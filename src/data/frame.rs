//! Column-oriented table for mixed numeric/categorical data
//!
//! The raw housing CSVs mix numeric and categorical columns and use empty
//! cells or the literal `NA` for missing values, so columns carry
//! `Option`-wrapped cells until imputation runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from frame construction and combination
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Column '{name}' has {got} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Frames have different schemas: '{0}' vs '{1}'")]
    SchemaMismatch(String, String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

/// A single typed column; `None` cells are nulls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Number of cells
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Number of null cells
    pub fn null_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Fraction of null cells (0.0 for an empty column)
    pub fn null_fraction(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.null_count() as f64 / self.len() as f64
        }
    }

    /// Median of the non-null numeric values (None for categorical or all-null)
    pub fn median(&self) -> Option<f64> {
        let Column::Numeric(cells) = self else {
            return None;
        };
        let mut values: Vec<f64> = cells.iter().filter_map(|c| *c).collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Some((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Some(values[mid])
        }
    }

    /// Most frequent non-null categorical value, ties broken by
    /// first-encountered row order (None for numeric or all-null)
    pub fn mode(&self) -> Option<String> {
        let Column::Categorical(cells) = self else {
            return None;
        };
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (row, cell) in cells.iter().enumerate() {
            if let Some(value) = cell {
                let entry = counts.entry(value.as_str()).or_insert((0, row));
                entry.0 += 1;
            }
        }
        counts
            .into_iter()
            .min_by_key(|(_, (count, first_row))| (usize::MAX - count, *first_row))
            .map(|(value, _)| value.to_string())
    }

    /// Append another column's cells; both must have the same type
    fn extend(&mut self, other: &Column) -> Result<(), FrameError> {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => {
                a.extend(b.iter().cloned());
                Ok(())
            }
            (Column::Categorical(a), Column::Categorical(b)) => {
                a.extend(b.iter().cloned());
                Ok(())
            }
            _ => Err(FrameError::SchemaMismatch(
                "numeric".to_string(),
                "categorical".to_string(),
            )),
        }
    }

    /// Copy of the cells in a row range
    fn slice(&self, start: usize, end: usize) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(v[start..end].to_vec()),
            Column::Categorical(v) => Column::Categorical(v[start..end].to_vec()),
        }
    }
}

/// Ordered mapping from column name to typed column
///
/// Column insertion order is preserved; downstream encoding and modeling
/// follow that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl DataFrame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (0 when there are no columns)
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &mut self.columns[i])
    }

    /// Iterate over (name, column) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Append a column; its length must match the existing rows
    pub fn push_column(&mut self, name: &str, column: Column) -> Result<(), FrameError> {
        if self.contains(name) {
            return Err(FrameError::DuplicateColumn(name.to_string()));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(FrameError::LengthMismatch {
                name: name.to_string(),
                expected: self.n_rows(),
                got: column.len(),
            });
        }
        self.names.push(name.to_string());
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column, returning it if present
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.names.remove(idx);
        Some(self.columns.remove(idx))
    }

    /// Remove a column, erroring if absent
    pub fn take_column(&mut self, name: &str) -> Result<Column, FrameError> {
        self.drop_column(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))
    }

    /// Stack `bottom` under `self`; both frames must share the same column
    /// names, order, and types
    pub fn concat(&self, bottom: &DataFrame) -> Result<DataFrame, FrameError> {
        if self.names != bottom.names {
            return Err(FrameError::SchemaMismatch(
                self.names.join(","),
                bottom.names.join(","),
            ));
        }
        let mut out = self.clone();
        for (col, other) in out.columns.iter_mut().zip(bottom.columns.iter()) {
            col.extend(other)?;
        }
        Ok(out)
    }

    /// Copy of the rows in `[start, end)` across all columns
    pub fn slice_rows(&self, start: usize, end: usize) -> DataFrame {
        DataFrame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.slice(start, end)).collect(),
        }
    }

    /// Total nulls across every column
    pub fn null_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(cells: &[Option<f64>]) -> Column {
        Column::Numeric(cells.to_vec())
    }

    fn categorical(cells: &[Option<&str>]) -> Column {
        Column::Categorical(cells.iter().map(|c| c.map(str::to_string)).collect())
    }

    #[test]
    fn test_null_fraction() {
        let col = numeric(&[Some(1.0), None, Some(3.0), None]);
        assert_eq!(col.null_count(), 2);
        assert!((col.null_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(numeric(&[Some(50.0), Some(70.0), None]).median(), Some(60.0));
        assert_eq!(
            numeric(&[Some(3.0), Some(1.0), Some(2.0)]).median(),
            Some(2.0)
        );
        assert_eq!(numeric(&[None, None]).median(), None);
    }

    #[test]
    fn test_mode_first_encountered_tie_break() {
        let col = categorical(&[Some("b"), Some("a"), Some("a"), Some("b"), None]);
        // "b" and "a" both appear twice; "b" was seen first
        assert_eq!(col.mode(), Some("b".to_string()));
    }

    #[test]
    fn test_push_column_length_check() {
        let mut frame = DataFrame::new();
        frame.push_column("x", numeric(&[Some(1.0), Some(2.0)])).unwrap();
        let err = frame.push_column("y", numeric(&[Some(1.0)]));
        assert!(matches!(err, Err(FrameError::LengthMismatch { .. })));
    }

    #[test]
    fn test_concat_and_slice_round_trip() {
        let mut top = DataFrame::new();
        top.push_column("x", numeric(&[Some(1.0), Some(2.0)])).unwrap();
        top.push_column("c", categorical(&[Some("a"), None])).unwrap();

        let mut bottom = DataFrame::new();
        bottom.push_column("x", numeric(&[Some(3.0)])).unwrap();
        bottom.push_column("c", categorical(&[Some("b")])).unwrap();

        let combined = top.concat(&bottom).unwrap();
        assert_eq!(combined.n_rows(), 3);

        let back = combined.slice_rows(2, 3);
        assert_eq!(back.n_rows(), 1);
        assert_eq!(back.column("x"), Some(&numeric(&[Some(3.0)])));
    }

    #[test]
    fn test_concat_schema_mismatch() {
        let mut top = DataFrame::new();
        top.push_column("x", numeric(&[Some(1.0)])).unwrap();
        let mut bottom = DataFrame::new();
        bottom.push_column("y", numeric(&[Some(1.0)])).unwrap();
        assert!(top.concat(&bottom).is_err());
    }
}
