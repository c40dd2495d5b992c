//! Quake Statistics - bounding statistics and magnitude-frequency regression
//!
//! - [`compute_bounding_statistics`]: extremes of magnitude, position and time
//! - [`compute_magnitude_frequency_distribution`]: binned cumulative counts and
//!   a Gutenberg-Richter least-squares fit with Student-t confidence bands
//!
//! Statistical degeneracy (too few bins, no spread) is reported through `None`
//! fields, never as an error.

#![deny(unsafe_code)]

pub mod bounds;
pub mod config;
pub mod distribution;
pub mod error;
pub mod mfd;
pub mod regression;

pub use bounds::compute_bounding_statistics;
pub use config::MfdConfig;
pub use distribution::{student_t_cdf, student_t_quantile};
pub use error::{StatisticsError, StatisticsResult};
pub use mfd::{
    compute_magnitude_frequency_distribution, compute_magnitude_frequency_distribution_with,
    GutenbergRichterFit, MagnitudeFrequencyDistribution, MfdBin,
};
pub use regression::{ordinary_least_squares, LinearFit};
