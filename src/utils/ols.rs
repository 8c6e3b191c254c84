//! Ordinary Least Squares regression used by the unit-root tests.

use crate::error::{ForecastError, Result};

/// OLS coefficients with their standard errors.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Coefficients in design-matrix column order.
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl OlsFit {
    /// t-ratio of coefficient `i`.
    pub fn t_stat(&self, i: usize) -> f64 {
        self.coefficients[i] / self.std_errors[i]
    }

    /// Gaussian AIC `n ln(RSS/n) + 2k` (constant terms dropped).
    pub fn aic(&self) -> f64 {
        let n = self.nobs as f64;
        n * (self.rss / n).ln() + 2.0 * self.coefficients.len() as f64
    }
}

/// Fit `y = X b + e` by the normal equations.
///
/// # Arguments
/// * `rows` - Design matrix, one row per observation (include a column of
///   ones for an intercept)
/// * `y` - Target values
///
/// # Errors
/// `InsufficientData` when there are not more observations than columns,
/// `DegenerateSeries` when `X'X` is not positive definite.
pub fn ols(rows: &[Vec<f64>], y: &[f64]) -> Result<OlsFit> {
    let n = y.len();
    if rows.len() != n {
        return Err(ForecastError::InvalidParameter(format!(
            "design matrix has {} rows for {} observations",
            rows.len(),
            n
        )));
    }
    let k = rows.first().map(Vec::len).unwrap_or(0);
    if k == 0 || n <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &yi) in rows.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * yi;
            for j in 0..=i {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in (i + 1)..k {
            xtx[i][j] = xtx[j][i];
        }
    }

    let l = cholesky(&xtx).ok_or(ForecastError::DegenerateSeries { variance: 0.0 })?;
    let coefficients = cholesky_solve(&l, &xty);

    let rss: f64 = rows
        .iter()
        .zip(y)
        .map(|(row, &yi)| {
            let fitted: f64 = row.iter().zip(&coefficients).map(|(x, b)| x * b).sum();
            (yi - fitted).powi(2)
        })
        .sum();
    let sigma2 = rss / (n - k) as f64;

    // diag((X'X)^-1) column by column
    let std_errors = (0..k)
        .map(|i| {
            let mut unit = vec![0.0; k];
            unit[i] = 1.0;
            let column = cholesky_solve(&l, &unit);
            (sigma2 * column[i]).sqrt()
        })
        .collect();

    Ok(OlsFit {
        coefficients,
        std_errors,
        rss,
        nobs: n,
    })
}

/// Lower-triangular Cholesky factor of a symmetric positive definite matrix.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= a[i][i].abs() * 1e-13 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L L' x = b`.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}
