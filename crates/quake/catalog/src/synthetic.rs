//! Stochastic event-set catalogs built from big-endian rupture records.
//!
//! Record layout (big-endian, packed):
//!
//! ```text
//! rupture_id i32 | parent_id i32 | generation i16 | origin_time i64 |
//! latitude f64 | longitude f64 | depth f64 | magnitude f64 |
//! dist_to_parent f64 | erf_index i32 | fss_index i32 | grid_node_index i32
//! ```

use bytes::{Buf, BufMut};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quake_types::{
    CanonicalRecord, CatalogError, CatalogResult, Event, OriginTimeUnit, SourceFormat,
};

use crate::source::{retain_by_mask, CatalogSource};

/// Size in bytes of one encoded rupture record.
pub const RECORD_SIZE: usize = 70;

/// Column names of a rupture record, in wire order.
pub const RUPTURE_FIELDS: [&str; 12] = [
    "rupture_id",
    "parent_id",
    "generation",
    "origin_time",
    "latitude",
    "longitude",
    "depth",
    "magnitude",
    "dist_to_parent",
    "erf_index",
    "fss_index",
    "grid_node_index",
];

/// One simulated rupture, exactly as stored on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuptureRecord {
    pub rupture_id: i32,
    pub parent_id: i32,
    pub generation: i16,
    /// Raw origin time in the producer's unit.
    pub origin_time: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub magnitude: f64,
    pub dist_to_parent: f64,
    pub erf_index: i32,
    pub fss_index: i32,
    pub grid_node_index: i32,
}

impl RuptureRecord {
    /// Decode one record from the front of `buf`.
    pub fn decode(mut buf: &[u8]) -> CatalogResult<Self> {
        if buf.len() < RECORD_SIZE {
            return Err(CatalogError::format(
                SourceFormat::SyntheticBinary,
                format!("record needs {RECORD_SIZE} bytes, found {}", buf.len()),
            ));
        }
        Ok(Self {
            rupture_id: buf.get_i32(),
            parent_id: buf.get_i32(),
            generation: buf.get_i16(),
            origin_time: buf.get_i64(),
            latitude: buf.get_f64(),
            longitude: buf.get_f64(),
            depth: buf.get_f64(),
            magnitude: buf.get_f64(),
            dist_to_parent: buf.get_f64(),
            erf_index: buf.get_i32(),
            fss_index: buf.get_i32(),
            grid_node_index: buf.get_i32(),
        })
    }

    /// Append the big-endian encoding of this record.
    pub fn encode<B: BufMut>(&self, out: &mut B) {
        out.put_i32(self.rupture_id);
        out.put_i32(self.parent_id);
        out.put_i16(self.generation);
        out.put_i64(self.origin_time);
        out.put_f64(self.latitude);
        out.put_f64(self.longitude);
        out.put_f64(self.depth);
        out.put_f64(self.magnitude);
        out.put_f64(self.dist_to_parent);
        out.put_i32(self.erf_index);
        out.put_i32(self.fss_index);
        out.put_i32(self.grid_node_index);
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        let mut cursor = &mut out[..];
        self.encode(&mut cursor);
        out
    }

    /// Numeric value of a named column.
    pub fn field(&self, name: &str) -> Option<f64> {
        let value = match name {
            "rupture_id" => self.rupture_id as f64,
            "parent_id" => self.parent_id as f64,
            "generation" => self.generation as f64,
            "origin_time" => self.origin_time as f64,
            "latitude" => self.latitude,
            "longitude" => self.longitude,
            "depth" => self.depth,
            "magnitude" => self.magnitude,
            "dist_to_parent" => self.dist_to_parent,
            "erf_index" => self.erf_index as f64,
            "fss_index" => self.fss_index as f64,
            "grid_node_index" => self.grid_node_index as f64,
            _ => return None,
        };
        Some(value)
    }
}

/// One member of a simulated ensemble.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticBinaryCatalog {
    records: Vec<RuptureRecord>,
    origin_time_unit: OriginTimeUnit,
}

impl SyntheticBinaryCatalog {
    /// Wrap decoded records; every origin time must map to a calendar date.
    pub fn new(records: Vec<RuptureRecord>, origin_time_unit: OriginTimeUnit) -> CatalogResult<Self> {
        for (index, record) in records.iter().enumerate() {
            origin_time_unit.to_datetime(record.origin_time).map_err(|e| {
                CatalogError::format(SourceFormat::SyntheticBinary, format!("record {index}: {e}"))
            })?;
        }
        Ok(Self {
            records,
            origin_time_unit,
        })
    }

    /// Decode a contiguous run of records.
    pub fn from_bytes(bytes: &[u8], origin_time_unit: OriginTimeUnit) -> CatalogResult<Self> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(CatalogError::format(
                SourceFormat::SyntheticBinary,
                format!(
                    "length {} is not a multiple of the {RECORD_SIZE}-byte record size",
                    bytes.len()
                ),
            ));
        }
        let records = bytes
            .chunks_exact(RECORD_SIZE)
            .map(RuptureRecord::decode)
            .collect::<CatalogResult<Vec<_>>>()?;
        Self::new(records, origin_time_unit)
    }

    /// Re-encode every record in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.records.len() * RECORD_SIZE);
        for record in &self.records {
            record.encode(&mut out);
        }
        out
    }

    pub fn records(&self) -> &[RuptureRecord] {
        &self.records
    }

    pub fn origin_time_unit(&self) -> OriginTimeUnit {
        self.origin_time_unit
    }

    pub fn events(&self) -> Vec<Event> {
        self.records
            .iter()
            .map(|r| Event {
                longitude: r.longitude,
                latitude: r.latitude,
                origin_time: self.origin_time_unit.to_epoch_seconds(r.origin_time),
                magnitude: r.magnitude,
                depth: r.depth,
                source_id: Some(r.rupture_id.to_string()),
            })
            .collect()
    }

    pub fn datetimes(&self) -> CatalogResult<Vec<DateTime<Utc>>> {
        self.records
            .iter()
            .map(|r| self.origin_time_unit.to_datetime(r.origin_time))
            .collect()
    }

    /// Column values; `origin_time` stays in the stored unit.
    pub(crate) fn field_values(&self, field: &str) -> Option<Vec<f64>> {
        if !RUPTURE_FIELDS.contains(&field) {
            return None;
        }
        Some(self.records.iter().filter_map(|r| r.field(field)).collect())
    }

    pub(crate) fn retain(&self, mask: &[bool]) -> Self {
        Self {
            records: retain_by_mask(&self.records, mask),
            origin_time_unit: self.origin_time_unit,
        }
    }
}

impl CatalogSource for SyntheticBinaryCatalog {
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
        self.records
            .iter()
            .map(|r| {
                let origin = self.origin_time_unit.to_datetime(r.origin_time)?;
                Ok(CanonicalRecord::new(
                    r.longitude,
                    r.latitude,
                    &origin,
                    r.magnitude,
                    r.depth,
                ))
            })
            .collect()
    }

    fn event_count(&self) -> usize {
        self.records.len()
    }

    fn magnitudes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.magnitude).collect()
    }

    fn epoch_times(&self) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| self.origin_time_unit.to_epoch_seconds(r.origin_time))
            .collect()
    }

    fn latitudes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.latitude).collect()
    }

    fn longitudes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.longitude).collect()
    }
}
