use thiserror::Error;

use quake_types::CatalogError;

/// Errors from the statistics engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatisticsError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: String,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl StatisticsError {
    pub fn invalid(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        StatisticsError::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }

    pub fn is_empty_catalog(&self) -> bool {
        matches!(self, StatisticsError::Catalog(CatalogError::EmptyCatalog))
    }
}

/// Convenience type alias for statistics results.
pub type StatisticsResult<T> = Result<T, StatisticsError>;
