//! Bounding statistics computed straight from a catalog's columns.

use quake_catalog::CatalogSource;
use quake_types::BoundingStatistics;

use crate::error::StatisticsResult;

/// Element-wise min/max of magnitude, latitude, longitude and origin time.
///
/// Fails with `EmptyCatalog` when the catalog holds no events.
pub fn compute_bounding_statistics<C>(catalog: &C) -> StatisticsResult<BoundingStatistics>
where
    C: CatalogSource + ?Sized,
{
    let stats = BoundingStatistics::from_columns(
        &catalog.magnitudes(),
        &catalog.latitudes(),
        &catalog.longitudes(),
        &catalog.epoch_times(),
    )?;
    Ok(stats)
}
