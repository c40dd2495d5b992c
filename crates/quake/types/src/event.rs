//! Seismic events and the canonical catalog row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogResult;
use crate::time::{epoch_seconds, CalendarFields};

/// A single seismic event in canonical units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub longitude: f64,
    pub latitude: f64,
    /// Seconds since the UTC epoch.
    pub origin_time: f64,
    pub magnitude: f64,
    pub depth: f64,
    /// Identifier assigned by the producing source, if any.
    pub source_id: Option<String>,
}

/// One row of the canonical catalog schema.
///
/// Field order is fixed: longitude, latitude, year, month, day, magnitude,
/// depth, hour, minute, second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanonicalRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub magnitude: f64,
    pub depth: f64,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl CanonicalRecord {
    /// Column names in schema order.
    pub const FIELD_NAMES: [&'static str; 10] = [
        "longitude",
        "latitude",
        "year",
        "month",
        "day",
        "magnitude",
        "depth",
        "hour",
        "minute",
        "second",
    ];

    /// Build a row, deriving calendar fields from the origin time.
    pub fn new(
        longitude: f64,
        latitude: f64,
        origin_time: &DateTime<Utc>,
        magnitude: f64,
        depth: f64,
    ) -> Self {
        let calendar = CalendarFields::from_datetime(origin_time);
        Self {
            longitude,
            latitude,
            year: calendar.year,
            month: calendar.month,
            day: calendar.day,
            magnitude,
            depth,
            hour: calendar.hour,
            minute: calendar.minute,
            second: calendar.second,
        }
    }

    pub fn calendar(&self) -> CalendarFields {
        CalendarFields {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }

    pub fn datetime(&self) -> CatalogResult<DateTime<Utc>> {
        self.calendar().to_datetime()
    }

    pub fn epoch_seconds(&self) -> CatalogResult<f64> {
        self.datetime().map(|dt| epoch_seconds(&dt))
    }

    /// Numeric value of a named column, if the schema has it.
    pub fn field(&self, name: &str) -> Option<f64> {
        let value = match name {
            "longitude" => self.longitude,
            "latitude" => self.latitude,
            "year" => self.year as f64,
            "month" => self.month as f64,
            "day" => self.day as f64,
            "magnitude" => self.magnitude,
            "depth" => self.depth,
            "hour" => self.hour as f64,
            "minute" => self.minute as f64,
            "second" => self.second as f64,
            _ => return None,
        };
        Some(value)
    }
}
