//! Quake Catalog - format variants and the tagged catalog
//!
//! Three source representations share one capability set ([`CatalogSource`]):
//!
//! - [`NativeCatalog`]: rows already in the canonical schema
//! - [`SyntheticBinaryCatalog`]: big-endian rupture records from a simulated ensemble
//! - [`ExternalServiceCatalog`]: events returned by an external feed
//!
//! [`Catalog`] wraps one of them with metadata and bounding statistics, and
//! supports filtering by `"<field> <operator> <threshold>"` statements.

#![deny(unsafe_code)]

pub mod catalog;
pub mod external;
pub mod native;
pub mod predicate;
pub mod source;
pub mod synthetic;

pub use catalog::{Catalog, CatalogData};
pub use external::{ExternalServiceCatalog, FeedEvent, FeedRecord, QueryWindow};
pub use native::NativeCatalog;
pub use predicate::{Comparison, FilterPredicate};
pub use source::CatalogSource;
pub use synthetic::{RuptureRecord, SyntheticBinaryCatalog, RECORD_SIZE, RUPTURE_FIELDS};

pub use quake_types::{
    BoundingStatistics, CanonicalRecord, CatalogError, CatalogMetadata, CatalogOptions,
    CatalogResult, Event, OriginTimeUnit, SourceFormat,
};
