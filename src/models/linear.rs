//! Ridge regression baseline
//!
//! Solves the penalized normal equations directly; the encoded housing
//! matrix has hundreds of collinear indicator columns, so plain OLS is
//! numerically fragile here and a small L2 penalty keeps X'X invertible.

use super::{ModelError, Regressor};
use crate::data::Dataset;
use ndarray::{concatenate, s, Array1, Array2, Axis};

/// Ridge regression via normal equations with an intercept
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    /// L2 penalty applied to all non-intercept coefficients
    alpha: f64,
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            coefficients: None,
            intercept: None,
        }
    }

    /// Solve (X'X + alpha*I) beta = X'y; the intercept is not penalized
    fn solve_normal_equations(
        &self,
        xtx: &Array2<f64>,
        xty: &Array1<f64>,
    ) -> Result<Array1<f64>, ModelError> {
        let n = xtx.nrows();
        let mut regularized = xtx.clone();
        for i in 1..n {
            regularized[[i, i]] += self.alpha;
        }
        // Small jitter on the full diagonal for numerical stability
        for i in 0..n {
            regularized[[i, i]] += 1e-10;
        }

        match cholesky_solve(&regularized, xty) {
            Ok(beta) => Ok(beta),
            Err(_) => gradient_solve(&regularized, xty),
        }
    }
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Regressor for RidgeRegression {
    fn fit(&mut self, dataset: &Dataset) -> Result<(), ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::EmptyData);
        }
        if dataset.n_samples() != dataset.targets.len() {
            return Err(ModelError::DimensionMismatch {
                expected: dataset.n_samples(),
                got: dataset.targets.len(),
            });
        }

        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();
        let x = Array2::from_shape_fn((n_samples, n_features), |(i, j)| dataset.features[i][j]);
        let y = Array1::from_vec(dataset.targets.clone());

        let ones = Array2::ones((n_samples, 1));
        let design = concatenate(Axis(1), &[ones.view(), x.view()])
            .map_err(|_| ModelError::DimensionMismatch {
                expected: n_samples,
                got: x.nrows(),
            })?;

        let xt = design.t();
        let xtx = xt.dot(&design);
        let xty = xt.dot(&y);

        let beta = self.solve_normal_equations(&xtx, &xty)?;
        self.intercept = Some(beta[0]);
        self.coefficients = Some(beta.slice(s![1..]).to_owned());
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let coefficients = self.coefficients.as_ref().ok_or(ModelError::NotTrained)?;
        let intercept = self.intercept.ok_or(ModelError::NotTrained)?;

        features
            .iter()
            .map(|row| {
                if row.len() != coefficients.len() {
                    return Err(ModelError::DimensionMismatch {
                        expected: coefficients.len(),
                        got: row.len(),
                    });
                }
                let dot: f64 = row
                    .iter()
                    .zip(coefficients.iter())
                    .map(|(a, b)| a * b)
                    .sum();
                Ok(dot + intercept)
            })
            .collect()
    }
}

/// Solve A x = b for symmetric positive-definite A via Cholesky
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(ModelError::SingularMatrix);
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L' x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}

/// Gradient-descent fallback when the Cholesky factorization fails
fn gradient_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = a.ncols();
    let mut x = Array1::<f64>::zeros(n);
    let learning_rate = 0.01;
    let max_iter = 1000;
    let tol = 1e-10;

    for _ in 0..max_iter {
        let residual = a.dot(&x) - b;
        let gradient = a.t().dot(&residual);

        let norm: f64 = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
        if norm < tol {
            break;
        }
        x = &x - &(&gradient * learning_rate);
    }
    Ok(x)
}
