//! CSV loading for the raw housing tables
//!
//! Column types are inferred from the data: a column is numeric when every
//! non-null cell parses as `f64`, otherwise categorical. Empty cells and the
//! literal `NA` are treated as nulls.

use super::frame::{Column, DataFrame};
use anyhow::{Context, Result};
use csv::Reader;
use std::fs::File;
use std::path::Path;

/// Cell values treated as missing
const NULL_TOKENS: [&str; 2] = ["", "NA"];

fn is_null(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell)
}

/// Load a headered CSV file into a [`DataFrame`]
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

    let mut reader = Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (row, result) in reader.records().enumerate() {
        let record = result
            .with_context(|| format!("Failed to parse row {} of {:?}", row + 1, path.as_ref()))?;
        for (col, cell) in record.iter().enumerate() {
            let trimmed = cell.trim();
            cells[col].push(if is_null(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            });
        }
    }

    let mut frame = DataFrame::new();
    for (name, column_cells) in headers.iter().zip(cells.into_iter()) {
        frame.push_column(name, infer_column(column_cells))?;
    }
    Ok(frame)
}

/// Infer a typed column from raw string cells
fn infer_column(cells: Vec<Option<String>>) -> Column {
    let all_numeric = cells
        .iter()
        .flatten()
        .all(|cell| cell.parse::<f64>().is_ok());
    let any_value = cells.iter().any(Option::is_some);

    if all_numeric && any_value {
        Column::Numeric(
            cells
                .into_iter()
                .map(|cell| cell.and_then(|c| c.parse().ok()))
                .collect(),
        )
    } else {
        Column::Categorical(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_csv_infers_types_and_nulls() {
        let (_dir, path) = write_csv(
            "Id,LotFrontage,Neighborhood\n\
             1,65,NAmes\n\
             2,NA,OldTown\n\
             3,80,\n",
        );

        let frame = read_csv(&path).unwrap();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.names(), &["Id", "LotFrontage", "Neighborhood"]);

        let frontage = frame.column("LotFrontage").unwrap();
        assert!(frontage.is_numeric());
        assert_eq!(frontage.null_count(), 1);

        let hood = frame.column("Neighborhood").unwrap();
        assert!(!hood.is_numeric());
        assert_eq!(hood.null_count(), 1);
    }

    #[test]
    fn test_read_csv_mixed_column_is_categorical() {
        let (_dir, path) = write_csv("Code\n12\nabc\n");
        let frame = read_csv(&path).unwrap();
        assert!(!frame.column("Code").unwrap().is_numeric());
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv("no/such/file.csv");
        assert!(err.is_err());
    }
}
