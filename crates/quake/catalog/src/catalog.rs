//! The tagged catalog: one event sequence, its metadata and its bounds.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use quake_types::{
    BoundingStatistics, CanonicalRecord, CatalogError, CatalogMetadata, CatalogOptions,
    CatalogResult, Event, OriginTimeUnit, SourceFormat,
};

use crate::external::{ExternalServiceCatalog, FeedEvent, QueryWindow};
use crate::native::NativeCatalog;
use crate::predicate::FilterPredicate;
use crate::source::CatalogSource;
use crate::synthetic::{RuptureRecord, SyntheticBinaryCatalog};

// ── Variant dispatch ────────────────────────────────────────────────

/// Format-specific event storage.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogData {
    Native(NativeCatalog),
    SyntheticBinary(SyntheticBinaryCatalog),
    ExternalService(ExternalServiceCatalog),
}

impl CatalogData {
    pub fn format(&self) -> SourceFormat {
        match self {
            CatalogData::Native(_) => SourceFormat::Native,
            CatalogData::SyntheticBinary(_) => SourceFormat::SyntheticBinary,
            CatalogData::ExternalService(_) => SourceFormat::ExternalService,
        }
    }

    fn source(&self) -> &dyn CatalogSource {
        match self {
            CatalogData::Native(c) => c,
            CatalogData::SyntheticBinary(c) => c,
            CatalogData::ExternalService(c) => c,
        }
    }

    fn field_values(&self, field: &str) -> Option<Vec<f64>> {
        match self {
            CatalogData::Native(c) => c.field_values(field),
            CatalogData::SyntheticBinary(c) => c.field_values(field),
            CatalogData::ExternalService(c) => c.field_values(field),
        }
    }

    fn retain(&self, mask: &[bool]) -> Self {
        match self {
            CatalogData::Native(c) => CatalogData::Native(c.retain(mask)),
            CatalogData::SyntheticBinary(c) => CatalogData::SyntheticBinary(c.retain(mask)),
            CatalogData::ExternalService(c) => CatalogData::ExternalService(c.retain(mask)),
        }
    }

    fn events(&self) -> Vec<Event> {
        match self {
            CatalogData::Native(c) => c.events(),
            CatalogData::SyntheticBinary(c) => c.events(),
            CatalogData::ExternalService(c) => c.events(),
        }
    }

    fn datetimes(&self) -> CatalogResult<Vec<DateTime<Utc>>> {
        match self {
            CatalogData::Native(c) => c.datetimes(),
            CatalogData::SyntheticBinary(c) => c.datetimes(),
            CatalogData::ExternalService(c) => Ok(c.datetimes()),
        }
    }
}

impl From<NativeCatalog> for CatalogData {
    fn from(catalog: NativeCatalog) -> Self {
        CatalogData::Native(catalog)
    }
}

impl From<SyntheticBinaryCatalog> for CatalogData {
    fn from(catalog: SyntheticBinaryCatalog) -> Self {
        CatalogData::SyntheticBinary(catalog)
    }
}

impl From<ExternalServiceCatalog> for CatalogData {
    fn from(catalog: ExternalServiceCatalog) -> Self {
        CatalogData::ExternalService(catalog)
    }
}

impl CatalogSource for CatalogData {
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
        self.source().to_canonical_form()
    }

    fn event_count(&self) -> usize {
        self.source().event_count()
    }

    fn magnitudes(&self) -> Vec<f64> {
        self.source().magnitudes()
    }

    fn epoch_times(&self) -> Vec<f64> {
        self.source().epoch_times()
    }

    fn latitudes(&self) -> Vec<f64> {
        self.source().latitudes()
    }

    fn longitudes(&self) -> Vec<f64> {
        self.source().longitudes()
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

/// An ordered event sequence with metadata and bounding statistics.
///
/// Bounds always describe the current events and are `None` for an empty
/// catalog. The only mutation is [`Catalog::filter`], which replaces events
/// and bounds together.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    metadata: CatalogMetadata,
    data: CatalogData,
    bounds: Option<BoundingStatistics>,
}

impl Catalog {
    pub fn new(data: impl Into<CatalogData>, options: CatalogOptions) -> CatalogResult<Self> {
        let data = data.into();
        let metadata = CatalogMetadata::from_options(data.format(), options);
        let bounds = compute_bounds(&data)?;
        debug!(
            catalog = metadata.display_name(),
            format = %metadata.format,
            events = data.event_count(),
            "constructed catalog"
        );
        Ok(Self {
            metadata,
            data,
            bounds,
        })
    }

    pub fn native(records: Vec<CanonicalRecord>, options: CatalogOptions) -> CatalogResult<Self> {
        Self::new(NativeCatalog::new(records)?, options)
    }

    pub fn synthetic(
        records: Vec<RuptureRecord>,
        origin_time_unit: OriginTimeUnit,
        options: CatalogOptions,
    ) -> CatalogResult<Self> {
        Self::new(SyntheticBinaryCatalog::new(records, origin_time_unit)?, options)
    }

    pub fn external<I>(
        events: I,
        window: Option<QueryWindow>,
        options: CatalogOptions,
    ) -> CatalogResult<Self>
    where
        I: IntoIterator,
        I::Item: FeedEvent,
    {
        Self::new(ExternalServiceCatalog::from_events(events, window)?, options)
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    pub fn format(&self) -> SourceFormat {
        self.metadata.format
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    pub fn bounds(&self) -> Option<&BoundingStatistics> {
        self.bounds.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.data.event_count() == 0
    }

    pub fn events(&self) -> Vec<Event> {
        self.data.events()
    }

    pub fn datetimes(&self) -> CatalogResult<Vec<DateTime<Utc>>> {
        self.data.datetimes()
    }

    /// Running event count `1..=n`, for cumulative plots against time.
    pub fn cumulative_event_counts(&self) -> Vec<f64> {
        (1..=self.data.event_count()).map(|n| n as f64).collect()
    }

    /// Keep only events matching `"<field> <operator> <threshold>"`.
    ///
    /// On error the catalog is left unchanged.
    pub fn filter(&mut self, statement: &str) -> CatalogResult<&mut Self> {
        let predicate = FilterPredicate::parse(statement)?;
        self.apply_filter(&predicate)
    }

    pub fn apply_filter(&mut self, predicate: &FilterPredicate) -> CatalogResult<&mut Self> {
        let values = self
            .data
            .field_values(&predicate.field)
            .ok_or_else(|| CatalogError::UnknownField {
                field: predicate.field.clone(),
                format: self.format(),
            })?;
        let mask: Vec<bool> = values.iter().map(|&v| predicate.matches(v)).collect();

        let data = self.data.retain(&mask);
        let bounds = compute_bounds(&data)?;
        let before = self.data.event_count();

        self.data = data;
        self.bounds = bounds;

        debug!(
            catalog = self.metadata.display_name(),
            predicate = %predicate,
            before,
            after = self.data.event_count(),
            "filtered catalog"
        );
        Ok(self)
    }

    /// Convert into a native catalog carrying the same identity.
    pub fn into_canonical(self) -> CatalogResult<Catalog> {
        let records = self.data.to_canonical_form()?;
        let metadata = self.metadata;
        let options = CatalogOptions {
            name: metadata.name,
            catalog_id: metadata.catalog_id,
            filename: metadata.filename,
            format_version: metadata.format_version,
        };
        Catalog::native(records, options)
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl CatalogSource for Catalog {
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
        self.data.to_canonical_form()
    }

    fn event_count(&self) -> usize {
        self.data.event_count()
    }

    fn magnitudes(&self) -> Vec<f64> {
        self.data.magnitudes()
    }

    fn epoch_times(&self) -> Vec<f64> {
        self.data.epoch_times()
    }

    fn latitudes(&self) -> Vec<f64> {
        self.data.latitudes()
    }

    fn longitudes(&self) -> Vec<f64> {
        self.data.longitudes()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.metadata.display_name())?;
        match &self.bounds {
            Some(bounds) => {
                writeln!(f, "Events: {}", self.data.event_count())?;
                write!(f, "{bounds}")
            }
            None => write!(f, "empty catalog"),
        }
    }
}

fn compute_bounds(data: &CatalogData) -> CatalogResult<Option<BoundingStatistics>> {
    if data.event_count() == 0 {
        return Ok(None);
    }
    BoundingStatistics::from_columns(
        &data.magnitudes(),
        &data.latitudes(),
        &data.longitudes(),
        &data.epoch_times(),
    )
    .map(Some)
}
