use thiserror::Error;

use quake_ensemble::EnsembleError;

/// Errors from forecast evaluation.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("forecast ensemble holds no simulated catalogs")]
    EmptyEnsemble,

    #[error("ensemble could not be read: {0}")]
    Ensemble(#[from] EnsembleError),
}

/// Convenience type alias for evaluation results.
pub type EvaluationResult<T> = Result<T, EvaluationError>;
