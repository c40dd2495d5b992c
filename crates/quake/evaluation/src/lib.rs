//! Quake Evaluation - consistency tests of forecast ensembles
//!
//! A forecast is an ensemble of simulated catalogs; evaluation compares a
//! statistic of the simulations against the same statistic of the observed
//! catalog through its empirical distribution. The results are numbers and
//! plot-ready data; accept/reject policy belongs to the caller.

#![deny(unsafe_code)]

pub mod ecdf;
pub mod error;
pub mod number_test;

pub use ecdf::{ecdf, greater_equal_ecdf, less_equal_ecdf, Ecdf};
pub use error::{EvaluationError, EvaluationResult};
pub use number_test::{number_test, number_test_counts, number_test_stream, NumberTestResult};
