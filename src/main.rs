//! Pipeline entry point
//!
//! Runs the full sequence: load the train/test CSVs, preprocess into
//! aligned numeric datasets, benchmark three models under 5-fold
//! cross-validation, grid-search the gradient boosting regressor, write the
//! submission file, and render the feature-importance chart.

use anyhow::{Context, Result};
use house_prices::data::{read_csv, Dataset};
use house_prices::features::Preprocessor;
use house_prices::ml::{cross_val_rmse, grid_search, CrossValidator, CvSplit, GbmGrid};
use house_prices::models::{
    ForestConfig, GbmRegressor, RandomForestRegressor, Regressor, RidgeRegression,
};
use house_prices::{plot, submission};
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Input CSV locations
const TRAIN_PATH: &str = "data/train.csv";
const TEST_PATH: &str = "data/test.csv";

/// Output directory for the submission file and the chart
const OUTPUT_DIR: &str = "predictionsubmission2";

/// Folds used for both the model benchmark and the grid search
const N_FOLDS: usize = 5;

/// Seed shared by every cross-validated evaluation
const CV_SEED: u64 = 42;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    println!("\n{}", "=".repeat(60));
    println!("  House Price Regression Pipeline");
    println!("  Gradient Boosting with Grid Search");
    println!("{}\n", "=".repeat(60));

    // 1. Load
    println!("📂 Stage 1: Loading Data");
    println!("{}", "-".repeat(40));
    let train_raw = read_csv(TRAIN_PATH).context("Loading training data")?;
    let test_raw = read_csv(TEST_PATH).context("Loading test data")?;
    println!(
        "   Train: {} rows x {} columns",
        train_raw.n_rows(),
        train_raw.n_cols()
    );
    println!(
        "   Test:  {} rows x {} columns\n",
        test_raw.n_rows(),
        test_raw.n_cols()
    );

    // 2. Preprocess
    println!("🧹 Stage 2: Preprocessing");
    println!("{}", "-".repeat(40));
    let processed = Preprocessor::new().run(&train_raw, &test_raw)?;
    println!(
        "   {} features after imputation and encoding",
        processed.train.n_features()
    );
    if !processed.dropped.is_empty() {
        println!("   Dropped sparse columns: {}", processed.dropped.join(", "));
    }
    println!();

    let splits = CrossValidator::k_fold(processed.train.n_samples(), N_FOLDS, CV_SEED);

    // 3. Benchmark
    println!("📊 Stage 3: Model Benchmark ({N_FOLDS}-fold CV RMSE)");
    println!("{}", "-".repeat(40));
    benchmark_models(&processed.train, &splits)?;
    println!();

    // 4. Tune
    println!("🔍 Stage 4: Grid Search");
    println!("{}", "-".repeat(40));
    let result = grid_search(&processed.train, &GbmGrid::default(), &splits)?;
    println!("   Best parameters: {}", result.best_params);
    println!("   Best CV RMSE: {:.4}\n", result.best_score);

    // 5. Predict and write the submission
    println!("💾 Stage 5: Final Fit and Submission");
    println!("{}", "-".repeat(40));
    let mut model = GbmRegressor::with_params(result.best_params);
    model.fit(&processed.train)?;

    let log_predictions = model.predict(&processed.test.features)?;
    let prices: Vec<f64> = log_predictions.iter().map(|p| p.exp_m1()).collect();

    let output_dir = Path::new(OUTPUT_DIR);
    let submission_path = submission::write_submission(&processed.test_ids, &prices, output_dir)?;
    println!("   Submission written to {:?}\n", submission_path);

    // 6. Visualize
    println!("📈 Stage 6: Feature Importance");
    println!("{}", "-".repeat(40));
    let chart_path = output_dir.join("feature_importance.png");
    plot::plot_feature_importance(
        &processed.train.feature_names,
        model.feature_importances(),
        &chart_path,
    )?;
    println!("   Chart written to {:?}", chart_path);

    Ok(())
}

/// Cross-validate the three benchmark configurations and print their RMSE
fn benchmark_models(train: &Dataset, splits: &[CvSplit]) -> Result<()> {
    let ridge = cross_val_rmse(train, splits, || RidgeRegression::new(1.0))?;
    info!("Ridge regression: {}", ridge.summary());
    println!("   Ridge regression:  {:.4}", ridge.mean);

    let forest = cross_val_rmse(train, splits, || {
        RandomForestRegressor::new(ForestConfig::default())
    })?;
    info!("Random forest: {}", forest.summary());
    println!("   Random forest:     {:.4}", forest.mean);

    let gbm = cross_val_rmse(train, splits, GbmRegressor::new)?;
    info!("Gradient boosting: {}", gbm.summary());
    println!("   Gradient boosting: {:.4}", gbm.mean);

    Ok(())
}
