//! Feature-importance chart rendering

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Chart size in pixels
const CHART_SIZE: (u32, u32) = (1000, 800);

/// How many of the highest-importance features to show
const TOP_FEATURES: usize = 20;

/// Left label area, sized for long indicator names
const LABEL_AREA: i32 = 200;

/// Headroom multiplier on the importance axis
const X_HEADROOM: f64 = 1.05;

/// Render a horizontal bar chart of the top feature importances
///
/// Features are ranked by importance descending and the top 20 are drawn,
/// highest at the top.
pub fn plot_feature_importance(
    names: &[String],
    importances: &[f64],
    path: &Path,
) -> Result<()> {
    anyhow::ensure!(
        names.len() == importances.len(),
        "{} names but {} importances",
        names.len(),
        importances.len()
    );
    anyhow::ensure!(!names.is_empty(), "No feature importances to plot");

    let mut ranked: Vec<(&str, f64)> = names
        .iter()
        .map(String::as_str)
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(TOP_FEATURES);
    // Ascending so the largest bar lands at the top of the y axis
    ranked.reverse();

    let max_importance = ranked
        .iter()
        .map(|(_, importance)| *importance)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-12);
    let n_bars = ranked.len() as i32;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("Failed to draw chart background for {:?}", path))?;

    let labels: Vec<String> = ranked.iter().map(|(name, _)| name.to_string()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Feature Importance (top 20)", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(LABEL_AREA)
        .build_cartesian_2d(0.0..max_importance * X_HEADROOM, (0..n_bars).into_segmented())
        .context("Failed to build chart axes")?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => labels
                .get(*index as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_labels(ranked.len())
        .x_desc("Importance")
        .draw()
        .context("Failed to draw chart mesh")?;

    chart
        .draw_series(ranked.iter().enumerate().map(|(index, (_, importance))| {
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(index as i32)),
                    (*importance, SegmentValue::Exact(index as i32 + 1)),
                ],
                BLUE.mix(0.6).filled(),
            )
        }))
        .context("Failed to draw importance bars")?;

    root.present()
        .with_context(|| format!("Failed to write chart to {:?}", path))?;

    info!("Wrote feature importance chart to {:?}", path);
    Ok(())
}
