//! Ordinary least squares for a single regressor.

use serde::{Deserialize, Serialize};

/// Fit of `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub residuals: Vec<f64>,
    pub mean_x: f64,
    /// Sum of squared deviations of `x` from its mean.
    pub sxx: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn residual_sum_of_squares(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }

    /// Root mean square of the residuals.
    pub fn rms(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        (self.residual_sum_of_squares() / self.residuals.len() as f64).sqrt()
    }
}

/// Least-squares line through `(x, y)`.
///
/// Returns `None` for mismatched or fewer than two points, or when `x` has
/// no spread.
pub fn ordinary_least_squares(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxy += dx * (yi - mean_y);
        sxx += dx * dx;
    }
    if sxx <= 0.0 || !sxx.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let residuals = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| yi - (intercept + slope * xi))
        .collect();

    Some(LinearFit {
        intercept,
        slope,
        residuals,
        mean_x,
        sxx,
    })
}
