//! Ordinary Least Squares With Intercept
//!
//! Fits `y = intercept + X·β` by centering every column and solving the centered
//! system with an SVD pseudo-inverse. Centering makes the intercept exact and
//! turns any constant column into a zero column, which the pseudo-inverse maps
//! to a zero coefficient instead of a singular solve. The result is the
//! minimum-norm least-squares solution.

use nalgebra::{DMatrix, DVector};

use crate::error::{EstimationError, Result};
use crate::utils::stats::mean;

/// A fitted linear model
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    /// One coefficient per feature column
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Fit OLS on `rows` (each row one observation) against `targets`.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Self> {
        let n = rows.len();
        if n == 0 || n != targets.len() {
            return Err(EstimationError::Solver(format!(
                "{} rows for {} targets",
                n,
                targets.len()
            )));
        }
        let p = rows[0].len();
        if rows.iter().any(|r| r.len() != p) {
            return Err(EstimationError::Solver("ragged design matrix".to_string()));
        }

        let column_means: Vec<f64> = (0..p)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n as f64)
            .collect();
        let target_mean = mean(targets);

        let x = DMatrix::from_fn(n, p, |i, j| rows[i][j] - column_means[j]);
        let y = DVector::from_iterator(n, targets.iter().map(|t| t - target_mean));

        let svd = x.svd(true, true);

        // Same cutoff as LAPACK gelsd with rcond = machine epsilon
        let max_sv = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let tolerance = max_sv * n.max(p) as f64 * f64::EPSILON;

        let beta = svd
            .solve(&y, tolerance)
            .map_err(|e| EstimationError::Solver(e.to_string()))?;

        if !beta.iter().all(|v| v.is_finite()) {
            return Err(EstimationError::Solver("non-finite coefficients".to_string()));
        }

        let coefficients: Vec<f64> = beta.iter().copied().collect();
        let intercept = target_mean
            - coefficients.iter().zip(&column_means).map(|(b, m)| b * m).sum::<f64>();

        tracing::debug!(
            "OLS fit on {}x{}: coefficients={:?}, intercept={:.6}",
            n,
            p,
            coefficients,
            intercept
        );

        Ok(LinearModel { coefficients, intercept })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self.coefficients.iter().zip(row).map(|(b, x)| b * x).sum::<f64>()
    }

    /// Root-mean-square residual over the given rows
    pub fn rmse(&self, rows: &[Vec<f64>], targets: &[f64]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        let sse: f64 = rows
            .iter()
            .zip(targets)
            .map(|(row, y)| {
                let residual = y - self.predict(row);
                residual * residual
            })
            .sum();
        (sse / rows.len() as f64).sqrt()
    }
}
