//! Quake - seismic catalog ingestion, statistics and forecast ensemble evaluation
//!
//! This crate is the entry point to the workspace:
//!
//! - **Catalogs** ([`quake_catalog`]): native rows, simulated binary records and
//!   external feed events behind one [`Catalog`] type with filtering
//! - **Ensembles** ([`quake_ensemble`]): streaming decode of merged binary files
//! - **Statistics** ([`quake_statistics`]): bounding statistics and
//!   magnitude-frequency regression
//! - **Evaluation** ([`quake_evaluation`]): ECDFs and the number test
//!
//! It also owns layered configuration ([`QuakeConfig`]) and logging setup
//! ([`telemetry::init`]).

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflow;

pub use config::{LoggingConfig, QuakeConfig};
pub use error::{QuakeError, QuakeResult};
pub use workflow::{magnitude_frequency, number_test_file, open_ensemble};

pub use quake_catalog::{
    Catalog, CatalogData, CatalogSource, ExternalServiceCatalog, FeedEvent, FeedRecord,
    FilterPredicate, NativeCatalog, QueryWindow, RuptureRecord, SyntheticBinaryCatalog,
};
pub use quake_ensemble::{EnsembleConfig, EnsembleError, EnsembleReader, EnsembleWriter};
pub use quake_evaluation::{number_test, number_test_stream, EvaluationError, NumberTestResult};
pub use quake_statistics::{
    compute_bounding_statistics, compute_magnitude_frequency_distribution,
    MagnitudeFrequencyDistribution, MfdConfig, StatisticsError,
};
pub use quake_types::{
    BoundingStatistics, CanonicalRecord, CatalogError, CatalogMetadata, CatalogOptions, Event,
    OriginTimeUnit, SourceFormat,
};
