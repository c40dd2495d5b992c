//! Empirical cumulative distribution functions.

use serde::{Deserialize, Serialize};

/// Step function `F(x) = P(X <= x)` of a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ecdf {
    /// Distinct sample values, ascending.
    pub x: Vec<f64>,
    /// Fraction of the sample at or below each `x`.
    pub y: Vec<f64>,
    /// Sample size.
    pub n: usize,
}

impl Ecdf {
    /// Build from a sample; NaN entries are dropped.
    pub fn new(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();

        let mut x: Vec<f64> = Vec::new();
        let mut y: Vec<f64> = Vec::new();
        for (i, &value) in sorted.iter().enumerate() {
            let fraction = (i + 1) as f64 / n as f64;
            if x.last() == Some(&value) {
                if let Some(last) = y.last_mut() {
                    *last = fraction;
                }
            } else {
                x.push(value);
                y.push(fraction);
            }
        }
        Self { x, y, n }
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// `P(X <= value)`; zero below the sample, one at or above its maximum.
    pub fn evaluate(&self, value: f64) -> f64 {
        let steps = self.x.partition_point(|&v| v <= value);
        if steps == 0 {
            0.0
        } else {
            self.y[steps - 1]
        }
    }
}

/// Distinct sorted values and their cumulative fractions.
pub fn ecdf(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let Ecdf { x, y, .. } = Ecdf::new(values);
    (x, y)
}

/// `P(X >= value)` over the sample, or `None` for an empty sample.
pub fn greater_equal_ecdf(values: &[f64], value: f64) -> Option<f64> {
    tail_fraction(values, |v| v >= value)
}

/// `P(X <= value)` over the sample, or `None` for an empty sample.
pub fn less_equal_ecdf(values: &[f64], value: f64) -> Option<f64> {
    tail_fraction(values, |v| v <= value)
}

fn tail_fraction(values: &[f64], keep: impl Fn(f64) -> bool) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let hits = values.iter().filter(|&&v| keep(v)).count();
    Some(hits as f64 / values.len() as f64)
}
