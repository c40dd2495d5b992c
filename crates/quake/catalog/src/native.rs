//! Catalogs already stored in the canonical schema.

use chrono::{DateTime, Utc};

use quake_types::{CanonicalRecord, CatalogError, CatalogResult, Event, SourceFormat};

use crate::source::{retain_by_mask, CatalogSource};

/// Pseudo-column holding the epoch seconds derived from the calendar fields.
const ORIGIN_TIME_FIELD: &str = "origin_time";

/// Canonical rows with their derived epoch times.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeCatalog {
    records: Vec<CanonicalRecord>,
    epoch_times: Vec<f64>,
}

impl NativeCatalog {
    /// Validate canonical rows: finite coordinates and a real UTC date-time.
    pub fn new(records: Vec<CanonicalRecord>) -> CatalogResult<Self> {
        let mut epoch_times = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let finite = [record.longitude, record.latitude, record.magnitude, record.depth]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(CatalogError::format(
                    SourceFormat::Native,
                    format!("row {index} has a non-finite coordinate, depth or magnitude"),
                ));
            }
            let seconds = record.epoch_seconds().map_err(|e| {
                CatalogError::format(SourceFormat::Native, format!("row {index}: {e}"))
            })?;
            epoch_times.push(seconds);
        }
        Ok(Self {
            records,
            epoch_times,
        })
    }

    /// Parse a JSON array of canonical rows; missing or mistyped keys are format errors.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let records: Vec<CanonicalRecord> = serde_json::from_str(json)
            .map_err(|e| CatalogError::format(SourceFormat::Native, e.to_string()))?;
        Self::new(records)
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn events(&self) -> Vec<Event> {
        self.records
            .iter()
            .zip(&self.epoch_times)
            .map(|(record, &origin_time)| Event {
                longitude: record.longitude,
                latitude: record.latitude,
                origin_time,
                magnitude: record.magnitude,
                depth: record.depth,
                source_id: None,
            })
            .collect()
    }

    pub fn datetimes(&self) -> CatalogResult<Vec<DateTime<Utc>>> {
        self.records.iter().map(CanonicalRecord::datetime).collect()
    }

    pub(crate) fn field_values(&self, field: &str) -> Option<Vec<f64>> {
        if field == ORIGIN_TIME_FIELD {
            return Some(self.epoch_times.clone());
        }
        if !CanonicalRecord::FIELD_NAMES.contains(&field) {
            return None;
        }
        Some(self.records.iter().filter_map(|r| r.field(field)).collect())
    }

    pub(crate) fn retain(&self, mask: &[bool]) -> Self {
        Self {
            records: retain_by_mask(&self.records, mask),
            epoch_times: retain_by_mask(&self.epoch_times, mask),
        }
    }
}

impl CatalogSource for NativeCatalog {
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
        Ok(self.records.clone())
    }

    fn event_count(&self) -> usize {
        self.records.len()
    }

    fn magnitudes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.magnitude).collect()
    }

    fn epoch_times(&self) -> Vec<f64> {
        self.epoch_times.clone()
    }

    fn latitudes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.latitude).collect()
    }

    fn longitudes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.longitude).collect()
    }
}
