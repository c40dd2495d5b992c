use thiserror::Error;

use quake_types::CatalogError;

/// Errors raised while decoding or encoding an ensemble file.
#[derive(Error, Debug)]
pub enum EnsembleError {
    #[error("truncated ensemble file at byte {offset}: {context} needs {expected} bytes, found {found}")]
    TruncatedFile {
        context: String,
        offset: u64,
        expected: usize,
        found: usize,
    },

    #[error("malformed ensemble file: {0}")]
    Format(String),

    #[error("ensemble I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl EnsembleError {
    pub fn is_truncation(&self) -> bool {
        matches!(self, EnsembleError::TruncatedFile { .. })
    }
}

/// Convenience type alias for ensemble results.
pub type EnsembleResult<T> = Result<T, EnsembleError>;
