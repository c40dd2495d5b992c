use thiserror::Error;

use quake_ensemble::EnsembleError;
use quake_evaluation::EvaluationError;
use quake_statistics::StatisticsError;
use quake_types::CatalogError;

/// Top-level error for callers using the `quake` facade.
#[derive(Debug, Error)]
pub enum QuakeError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("telemetry initialisation failed: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ensemble(#[from] EnsembleError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Convenience type alias for facade results.
pub type QuakeResult<T> = Result<T, QuakeError>;
