//! Quake Types - canonical seismic event model
//!
//! Every catalog source format normalizes into the types defined here:
//! events, canonical schema rows, bounding statistics and catalog metadata.
//! Origin times are `f64` seconds since the UTC epoch.

#![deny(unsafe_code)]

pub mod bounds;
pub mod error;
pub mod event;
pub mod metadata;
pub mod time;

pub use bounds::BoundingStatistics;
pub use error::{CatalogError, CatalogResult};
pub use event::{CanonicalRecord, Event};
pub use metadata::{CatalogMetadata, CatalogOptions, SourceFormat};
pub use time::{datetime_from_epoch_seconds, epoch_seconds, CalendarFields, OriginTimeUnit};
