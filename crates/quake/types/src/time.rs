//! Epoch and calendar conversions.
//!
//! Canonical origin times are `f64` seconds since the UTC epoch. Calendar
//! fields are derived from them and truncate to whole seconds.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Unit of an integer origin time stored by a source format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginTimeUnit {
    Seconds,
    #[default]
    Milliseconds,
    Microseconds,
}

impl OriginTimeUnit {
    /// Number of raw ticks per second.
    pub fn ticks_per_second(self) -> i64 {
        match self {
            OriginTimeUnit::Seconds => 1,
            OriginTimeUnit::Milliseconds => 1_000,
            OriginTimeUnit::Microseconds => 1_000_000,
        }
    }

    /// Convert a raw origin time into canonical epoch seconds.
    ///
    /// Exact for raw magnitudes up to 2^53; beyond that the nearest `f64` is used.
    pub fn to_epoch_seconds(self, raw: i64) -> f64 {
        raw as f64 / self.ticks_per_second() as f64
    }

    /// Convert a raw origin time straight to a UTC datetime without passing through `f64`.
    pub fn to_datetime(self, raw: i64) -> CatalogResult<DateTime<Utc>> {
        let converted = match self {
            OriginTimeUnit::Seconds => DateTime::from_timestamp(raw, 0),
            OriginTimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw),
            OriginTimeUnit::Microseconds => DateTime::from_timestamp_micros(raw),
        };
        converted.ok_or_else(|| {
            CatalogError::InvalidTimestamp(format!("{raw} {self:?} is outside the calendar range"))
        })
    }
}

/// Convert canonical epoch seconds to a UTC datetime (nanosecond rounding).
pub fn datetime_from_epoch_seconds(seconds: f64) -> CatalogResult<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(CatalogError::InvalidTimestamp(format!("{seconds} is not finite")));
    }
    let mut whole = seconds.floor();
    let mut nanos = ((seconds - whole) * NANOS_PER_SECOND).round();
    if nanos >= NANOS_PER_SECOND {
        whole += 1.0;
        nanos = 0.0;
    }
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return Err(CatalogError::InvalidTimestamp(format!(
            "{seconds} s is outside the calendar range"
        )));
    }
    DateTime::from_timestamp(whole as i64, nanos as u32).ok_or_else(|| {
        CatalogError::InvalidTimestamp(format!("{seconds} s is outside the calendar range"))
    })
}

/// Canonical epoch seconds for a UTC datetime.
pub fn epoch_seconds(datetime: &DateTime<Utc>) -> f64 {
    datetime.timestamp() as f64 + datetime.timestamp_subsec_nanos() as f64 / NANOS_PER_SECOND
}

/// Calendar encoding of an origin time, as used by the canonical schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl CalendarFields {
    pub fn from_datetime(datetime: &DateTime<Utc>) -> Self {
        Self {
            year: datetime.year(),
            month: datetime.month() as i32,
            day: datetime.day() as i32,
            hour: datetime.hour() as i32,
            minute: datetime.minute() as i32,
            second: datetime.second() as i32,
        }
    }

    pub fn to_datetime(&self) -> CatalogResult<DateTime<Utc>> {
        let invalid = || CatalogError::InvalidTimestamp(format!("{self:?} is not a valid UTC date-time"));
        let month = u32::try_from(self.month).map_err(|_| invalid())?;
        let day = u32::try_from(self.day).map_err(|_| invalid())?;
        let hour = u32::try_from(self.hour).map_err(|_| invalid())?;
        let minute = u32::try_from(self.minute).map_err(|_| invalid())?;
        let second = u32::try_from(self.second).map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(self.year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(|naive| naive.and_utc())
            .ok_or_else(invalid)
    }
}
