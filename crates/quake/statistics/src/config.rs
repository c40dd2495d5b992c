//! Magnitude-frequency settings.

use serde::{Deserialize, Serialize};

use crate::error::{StatisticsError, StatisticsResult};

/// Upper bound on bins a single distribution may produce.
pub const MAX_BINS: usize = 100_000;

/// Binning and confidence settings for the magnitude-frequency distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfdConfig {
    /// Magnitude bin width.
    pub bin_width: f64,
    /// Two-sided significance level of the confidence bands.
    pub confidence_level: f64,
}

impl Default for MfdConfig {
    fn default() -> Self {
        Self {
            bin_width: 0.3,
            confidence_level: 0.05,
        }
    }
}

impl MfdConfig {
    pub fn new(bin_width: f64, confidence_level: f64) -> StatisticsResult<Self> {
        let config = Self {
            bin_width,
            confidence_level,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StatisticsResult<()> {
        if !self.bin_width.is_finite() || self.bin_width <= 0.0 {
            return Err(StatisticsError::invalid(
                "bin_width",
                self.bin_width,
                "must be finite and positive",
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(StatisticsError::invalid(
                "confidence_level",
                self.confidence_level,
                "must lie strictly between 0 and 1",
            ));
        }
        Ok(())
    }
}
