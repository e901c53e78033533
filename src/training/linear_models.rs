//! Ordinary least squares linear regression

use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

/// Relative size below which a Cholesky pivot marks a dependent column
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solve the symmetric positive semi-definite system Ax = b with a
/// rank-revealing Cholesky decomposition.
///
/// Columns are taken in order; a column whose pivot collapses relative to its
/// own diagonal entry is linearly dependent on the columns before it. It is
/// left out of the factorization and receives a zero solution entry. Returns
/// the solution and the flags of the dropped columns.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<(Array1<f64>, Vec<bool>)> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let max_diag = a.diag().iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let mut l = Array2::<f64>::zeros((n, n));
    let mut dropped = vec![false; n];

    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }

        let scale = a[[j, j]].abs();
        if scale <= PIVOT_TOLERANCE * max_diag || diag <= PIVOT_TOLERANCE * scale {
            dropped[j] = true;
            continue;
        }

        let pivot = diag.sqrt();
        l[[j, j]] = pivot;
        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / pivot;
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        if dropped[i] {
            continue;
        }
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[[i, j]] * y[j];
        }
        y[i] = sum / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        if dropped[i] {
            continue;
        }
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[[j, i]] * x[j];
        }
        x[i] = sum / l[[i, i]];
    }

    Some((x, dropped))
}

/// Linear regression model
#[derive(Debug, Clone)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Columns found linearly dependent during the last fit
    dropped: Vec<usize>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            dropped: Vec::new(),
        }
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(ForecastError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(ForecastError::ProcessingError(
                "Cannot fit a linear model on zero samples".to_string(),
            ));
        }

        // Centering absorbs the intercept
        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let y_mean = y.mean().unwrap_or(0.0);
        let x_work = x - &x_mean.view().insert_axis(Axis(0));
        let y_work = y - y_mean;

        // Normal equations: (X^T X) w = X^T y
        let xtx = x_work.t().dot(&x_work);
        let xty = x_work.t().dot(&y_work);

        let (coefficients, dropped) = cholesky_solve(&xtx, &xty).ok_or_else(|| {
            ForecastError::ProcessingError(
                "Normal equations are not square, cannot solve least squares".to_string(),
            )
        })?;

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ProcessingError(
                "Matrix is singular, cannot solve least squares".to_string(),
            ));
        }

        self.intercept = Some(y_mean - coefficients.dot(&x_mean));
        self.coefficients = Some(coefficients);
        self.dropped = dropped
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| d.then_some(i))
            .collect();
        if !self.dropped.is_empty() {
            debug!(dropped = ?self.dropped, "Linearly dependent columns left out of the fit");
        }

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(ForecastError::ModelNotFitted)?;

        if x.ncols() != coefficients.len() {
            return Err(ForecastError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}
