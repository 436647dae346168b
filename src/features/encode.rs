//! One-hot encoding and train/test column alignment

use super::PreprocessError;
use crate::data::{Column, DataFrame};

/// One-hot encode every categorical column, leaving numeric columns as-is
///
/// Each distinct category value becomes an indicator column named
/// `column=value`; values are ordered by first appearance in the rows. Null
/// category cells produce all-zero indicators.
pub fn one_hot_encode(frame: &DataFrame) -> Result<DataFrame, PreprocessError> {
    let mut encoded = DataFrame::new();
    for (name, column) in frame.iter() {
        match column {
            Column::Numeric(_) => {
                encoded.push_column(name, column.clone())?;
            }
            Column::Categorical(cells) => {
                for value in distinct_values(cells) {
                    let indicator: Vec<Option<f64>> = cells
                        .iter()
                        .map(|cell| {
                            Some(if cell.as_deref() == Some(value.as_str()) {
                                1.0
                            } else {
                                0.0
                            })
                        })
                        .collect();
                    encoded.push_column(&format!("{name}={value}"), Column::Numeric(indicator))?;
                }
            }
        }
    }
    Ok(encoded)
}

/// Distinct non-null values in first-encountered order
fn distinct_values(cells: &[Option<String>]) -> Vec<String> {
    let mut seen = Vec::new();
    for cell in cells.iter().flatten() {
        if !seen.contains(cell) {
            seen.push(cell.clone());
        }
    }
    seen
}

/// Reindex a numeric frame against a reference column set
///
/// Columns absent from `frame` are filled with zeros; columns absent from
/// `names` are dropped. The output column order follows `names`.
pub fn reindex_columns(frame: &DataFrame, names: &[String]) -> Result<DataFrame, PreprocessError> {
    let n_rows = frame.n_rows();
    let mut out = DataFrame::new();
    for name in names {
        let column = frame
            .column(name)
            .cloned()
            .unwrap_or_else(|| Column::Numeric(vec![Some(0.0); n_rows]));
        out.push_column(name, column)?;
    }
    Ok(out)
}

/// Convert an all-numeric frame into (names, row-major matrix)
///
/// Any remaining null is an imputation failure and aborts the run.
pub fn to_matrix(frame: &DataFrame) -> Result<(Vec<String>, Vec<Vec<f64>>), PreprocessError> {
    let names: Vec<String> = frame.names().to_vec();
    let mut rows = vec![Vec::with_capacity(names.len()); frame.n_rows()];

    for (name, column) in frame.iter() {
        let Column::Numeric(cells) = column else {
            return Err(PreprocessError::NotNumeric(name.to_string()));
        };
        for (row, cell) in rows.iter_mut().zip(cells.iter()) {
            let value = cell.ok_or_else(|| PreprocessError::NullsRemain {
                column: name.to_string(),
            })?;
            row.push(value);
        }
    }
    Ok((names, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(columns: Vec<(&str, Column)>) -> DataFrame {
        let mut frame = DataFrame::new();
        for (name, column) in columns {
            frame.push_column(name, column).unwrap();
        }
        frame
    }

    #[test]
    fn test_one_hot_first_encountered_order() {
        let frame = frame_with(vec![
            ("x", Column::Numeric(vec![Some(1.0), Some(2.0), Some(3.0)])),
            (
                "color",
                Column::Categorical(vec![
                    Some("red".to_string()),
                    Some("blue".to_string()),
                    Some("red".to_string()),
                ]),
            ),
        ]);

        let encoded = one_hot_encode(&frame).unwrap();
        assert_eq!(encoded.names(), &["x", "color=red", "color=blue"]);

        let Some(Column::Numeric(red)) = encoded.column("color=red") else {
            panic!()
        };
        assert_eq!(red, &vec![Some(1.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_reindex_fills_missing_with_zero() {
        let frame = frame_with(vec![(
            "a",
            Column::Numeric(vec![Some(1.0), Some(2.0)]),
        )]);
        let names = vec!["a".to_string(), "b".to_string()];

        let aligned = reindex_columns(&frame, &names).unwrap();
        assert_eq!(aligned.names(), &["a", "b"]);

        let Some(Column::Numeric(b)) = aligned.column("b") else {
            panic!()
        };
        assert_eq!(b, &vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_reindex_drops_extra_columns() {
        let frame = frame_with(vec![
            ("a", Column::Numeric(vec![Some(1.0)])),
            ("extra", Column::Numeric(vec![Some(9.0)])),
        ]);
        let aligned = reindex_columns(&frame, &["a".to_string()]).unwrap();
        assert_eq!(aligned.names(), &["a"]);
    }

    #[test]
    fn test_to_matrix_rejects_nulls() {
        let frame = frame_with(vec![("a", Column::Numeric(vec![Some(1.0), None]))]);
        let err = to_matrix(&frame).unwrap_err();
        assert!(matches!(err, PreprocessError::NullsRemain { column } if column == "a"));
    }

    #[test]
    fn test_to_matrix_row_major() {
        let frame = frame_with(vec![
            ("a", Column::Numeric(vec![Some(1.0), Some(2.0)])),
            ("b", Column::Numeric(vec![Some(3.0), Some(4.0)])),
        ]);
        let (names, rows) = to_matrix(&frame).unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(rows, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }
}
