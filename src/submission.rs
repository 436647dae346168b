//! Submission file output

use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One submission row
#[derive(Debug, Serialize)]
struct SubmissionRow {
    #[serde(rename = "Id")]
    id: i64,
    #[serde(rename = "SalePrice")]
    sale_price: f64,
}

/// Write `submission.csv` under `output_dir`, creating the directory if
/// needed; an existing file is overwritten
///
/// `prices` must already be back on the original price scale (expm1 applied).
pub fn write_submission(ids: &[i64], prices: &[f64], output_dir: &Path) -> Result<PathBuf> {
    anyhow::ensure!(
        ids.len() == prices.len(),
        "{} ids but {} predictions",
        ids.len(),
        prices.len()
    );

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let path = output_dir.join("submission.csv");
    let mut writer =
        Writer::from_path(&path).with_context(|| format!("Failed to create {:?}", path))?;

    for (&id, &sale_price) in ids.iter().zip(prices.iter()) {
        writer.serialize(SubmissionRow { id, sale_price })?;
    }
    writer.flush()?;

    info!("Wrote {} predictions to {:?}", ids.len(), path);
    Ok(path)
}
