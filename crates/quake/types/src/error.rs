use thiserror::Error;

use crate::metadata::SourceFormat;

/// Errors raised while constructing, converting or filtering a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("{format} source violates its schema: {reason}")]
    Format { format: SourceFormat, reason: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("inconsistent catalog columns: {0}")]
    InconsistentColumns(String),

    #[error("unknown field '{field}' for {format} catalog")]
    UnknownField { field: String, format: SourceFormat },

    #[error("invalid filter predicate '{statement}': {reason}")]
    InvalidPredicate { statement: String, reason: String },

    #[error("statistics requested on an empty catalog")]
    EmptyCatalog,
}

impl CatalogError {
    pub fn format(format: SourceFormat, reason: impl Into<String>) -> Self {
        CatalogError::Format {
            format,
            reason: reason.into(),
        }
    }

    pub fn invalid_predicate(statement: &str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidPredicate {
            statement: statement.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from malformed input rather than a degenerate request.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, CatalogError::EmptyCatalog)
    }
}

/// Convenience type alias for catalog results.
pub type CatalogResult<T> = Result<T, CatalogError>;
