//! Missing-value handling over the combined train+test frame

use crate::data::{Column, DataFrame};
use std::collections::HashMap;
use tracing::debug;

/// Frontage column filled from per-neighborhood medians
pub const FRONTAGE: &str = "LotFrontage";
/// Grouping column for the frontage fill
pub const NEIGHBORHOOD: &str = "Neighborhood";

/// Drop every column whose null fraction exceeds `threshold`
///
/// Returns the dropped column names in frame order.
pub fn drop_sparse_columns(frame: &mut DataFrame, threshold: f64) -> Vec<String> {
    let sparse: Vec<String> = frame
        .iter()
        .filter(|(_, column)| column.null_fraction() > threshold)
        .map(|(name, _)| name.to_string())
        .collect();

    for name in &sparse {
        frame.drop_column(name);
        debug!("Dropped sparse column '{}'", name);
    }
    sparse
}

/// Fill frontage nulls with the median frontage of the row's neighborhood
///
/// Neighborhoods with no known frontage (and rows with a null neighborhood)
/// fall back to the global median. A no-op unless both columns are present.
pub fn impute_frontage_by_neighborhood(frame: &mut DataFrame) {
    let Some(Column::Categorical(neighborhoods)) = frame.column(NEIGHBORHOOD) else {
        return;
    };
    let Some(Column::Numeric(frontages)) = frame.column(FRONTAGE) else {
        return;
    };

    let mut by_group: HashMap<&str, Vec<f64>> = HashMap::new();
    for (hood, frontage) in neighborhoods.iter().zip(frontages.iter()) {
        if let (Some(hood), Some(frontage)) = (hood, frontage) {
            by_group.entry(hood.as_str()).or_default().push(*frontage);
        }
    }

    let global = median(frontages.iter().filter_map(|c| *c).collect());
    let group_medians: HashMap<String, f64> = by_group
        .into_iter()
        .filter_map(|(hood, values)| median(values).map(|m| (hood.to_string(), m)))
        .collect();

    let neighborhoods = neighborhoods.clone();
    if let Some(Column::Numeric(frontages)) = frame.column_mut(FRONTAGE) {
        for (cell, hood) in frontages.iter_mut().zip(neighborhoods.iter()) {
            if cell.is_none() {
                *cell = hood
                    .as_ref()
                    .and_then(|h| group_medians.get(h).copied())
                    .or(global);
            }
        }
    }
}

/// Fill remaining nulls: numeric columns with their global median,
/// categorical columns with their most frequent value
pub fn impute_medians_and_modes(frame: &mut DataFrame) {
    let names: Vec<String> = frame.names().to_vec();
    for name in names {
        let Some(column) = frame.column(&name) else {
            continue;
        };
        match column {
            Column::Numeric(_) => {
                let fill = column.median();
                if let (Some(fill), Some(Column::Numeric(cells))) =
                    (fill, frame.column_mut(&name))
                {
                    for cell in cells.iter_mut() {
                        cell.get_or_insert(fill);
                    }
                }
            }
            Column::Categorical(_) => {
                let fill = column.mode();
                if let (Some(fill), Some(Column::Categorical(cells))) =
                    (fill, frame.column_mut(&name))
                {
                    for cell in cells.iter_mut() {
                        cell.get_or_insert_with(|| fill.clone());
                    }
                }
            }
        }
    }
}

fn median(mut values: Vec<f64>) -> Option<f64> {
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
