//! Decoder configuration.

use serde::{Deserialize, Serialize};

use quake_types::OriginTimeUnit;

/// How raw section records are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Unit of the int64 origin time stored in each record.
    #[serde(default)]
    pub origin_time_unit: OriginTimeUnit,
}

impl EnsembleConfig {
    pub fn with_origin_time_unit(unit: OriginTimeUnit) -> Self {
        Self {
            origin_time_unit: unit,
        }
    }
}
