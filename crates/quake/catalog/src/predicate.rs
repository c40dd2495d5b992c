//! Filter statements of the form `<field> <operator> <threshold>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use quake_types::{CatalogError, CatalogResult};

/// Comparison operator of a filter statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Equal,
}

impl Comparison {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            ">=" => Some(Comparison::GreaterEqual),
            "<=" => Some(Comparison::LessEqual),
            "==" => Some(Comparison::Equal),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::GreaterEqual => ">=",
            Comparison::LessEqual => "<=",
            Comparison::Equal => "==",
        }
    }

    pub fn apply(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::Less => value < threshold,
            Comparison::GreaterEqual => value >= threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Equal => value == threshold,
        }
    }
}

/// A parsed filter statement, e.g. `magnitude >= 4.5`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl FilterPredicate {
    /// Parse exactly three whitespace-separated tokens.
    pub fn parse(statement: &str) -> CatalogResult<Self> {
        let tokens: Vec<&str> = statement.split_whitespace().collect();
        let [field, operator, threshold] = tokens.as_slice() else {
            return Err(CatalogError::invalid_predicate(
                statement,
                format!(
                    "expected '<field> <operator> <threshold>', found {} tokens",
                    tokens.len()
                ),
            ));
        };

        let comparison = Comparison::from_symbol(operator).ok_or_else(|| {
            CatalogError::invalid_predicate(statement, format!("unsupported operator '{operator}'"))
        })?;

        let threshold = threshold
            .parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan())
            .ok_or_else(|| {
                CatalogError::invalid_predicate(
                    statement,
                    format!("threshold '{threshold}' is not numeric"),
                )
            })?;

        Ok(Self {
            field: (*field).to_string(),
            comparison,
            threshold,
        })
    }

    pub fn matches(&self, value: f64) -> bool {
        self.comparison.apply(value, self.threshold)
    }
}

impl FromStr for FilterPredicate {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.comparison.symbol(), self.threshold)
    }
}
