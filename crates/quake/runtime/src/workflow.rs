//! Config-driven entry points tying the decoder, statistics and evaluation together.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use quake_catalog::{Catalog, CatalogSource};
use quake_ensemble::EnsembleReader;
use quake_evaluation::{number_test_stream, NumberTestResult};
use quake_statistics::{
    compute_magnitude_frequency_distribution_with, MagnitudeFrequencyDistribution,
};

use crate::config::QuakeConfig;
use crate::error::QuakeResult;

/// Open an ensemble file with the configured origin-time unit.
pub fn open_ensemble(
    path: impl AsRef<Path>,
    config: &QuakeConfig,
) -> QuakeResult<EnsembleReader<BufReader<File>>> {
    Ok(EnsembleReader::open(path, config.ensemble)?)
}

/// Stream an ensemble file through the number test against `observation`.
pub fn number_test_file(
    path: impl AsRef<Path>,
    observation: &Catalog,
    config: &QuakeConfig,
) -> QuakeResult<NumberTestResult> {
    let path = path.as_ref();
    let reader = open_ensemble(path, config)?;
    let declared = reader.declared_sections();
    let forecast = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let result = number_test_stream(reader, observation)?
        .with_names(forecast, observation.metadata().display_name());
    info!(
        path = %path.display(),
        sections = declared,
        observed = observation.event_count(),
        delta1 = result.delta1,
        delta2 = result.delta2,
        "evaluated ensemble file"
    );
    Ok(result)
}

/// Magnitude-frequency distribution with the configured binning.
pub fn magnitude_frequency<C>(
    catalog: &C,
    config: &QuakeConfig,
) -> QuakeResult<MagnitudeFrequencyDistribution>
where
    C: CatalogSource + ?Sized,
{
    Ok(compute_magnitude_frequency_distribution_with(catalog, &config.statistics)?)
}
