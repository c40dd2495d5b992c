//! Bounding statistics over a catalog's current events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::time::datetime_from_epoch_seconds;

/// Element-wise extremes of a catalog's magnitude, position and time columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingStatistics {
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    /// Earliest origin time, epoch seconds.
    pub start_epoch: f64,
    /// Latest origin time, epoch seconds.
    pub end_epoch: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl BoundingStatistics {
    /// Compute extremes over parallel columns.
    ///
    /// Fails with [`CatalogError::EmptyCatalog`] when the columns hold no events.
    pub fn from_columns(
        magnitudes: &[f64],
        latitudes: &[f64],
        longitudes: &[f64],
        epoch_times: &[f64],
    ) -> CatalogResult<Self> {
        let n = magnitudes.len();
        if n == 0 {
            return Err(CatalogError::EmptyCatalog);
        }
        if latitudes.len() != n || longitudes.len() != n || epoch_times.len() != n {
            return Err(CatalogError::InconsistentColumns(format!(
                "{} magnitudes, {} latitudes, {} longitudes, {} times",
                n,
                latitudes.len(),
                longitudes.len(),
                epoch_times.len()
            )));
        }

        let (min_magnitude, max_magnitude) = extremes(magnitudes);
        let (min_latitude, max_latitude) = extremes(latitudes);
        let (min_longitude, max_longitude) = extremes(longitudes);
        let (start_epoch, end_epoch) = extremes(epoch_times);

        Ok(Self {
            min_magnitude,
            max_magnitude,
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
            start_epoch,
            end_epoch,
            start_time: datetime_from_epoch_seconds(start_epoch)?,
            end_time: datetime_from_epoch_seconds(end_epoch)?,
        })
    }

    pub fn magnitude_range(&self) -> f64 {
        self.max_magnitude - self.min_magnitude
    }

    pub fn duration_seconds(&self) -> f64 {
        self.end_epoch - self.start_epoch
    }
}

impl fmt::Display for BoundingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start Date: {}", self.start_time.date_naive())?;
        writeln!(f, "End Date: {}", self.end_time.date_naive())?;
        writeln!(
            f,
            "Latitude: ({:.2}, {:.2})",
            self.min_latitude, self.max_latitude
        )?;
        writeln!(
            f,
            "Longitude: ({:.2}, {:.2})",
            self.min_longitude, self.max_longitude
        )?;
        writeln!(f, "Min Mw: {:.2}", self.min_magnitude)?;
        write!(f, "Max Mw: {:.2}", self.max_magnitude)
    }
}

// NaN entries are skipped, matching `f64::min`/`f64::max`.
fn extremes(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}
