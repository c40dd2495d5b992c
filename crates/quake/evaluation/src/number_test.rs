//! The number test: is the observed event count plausible under the forecast?
//!
//! Each simulated catalog contributes its event count. `delta1` is the
//! fraction of simulations with at least the observed count, `delta2` the
//! fraction with at most the observed count. Interpreting them is left to
//! the caller.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use quake_catalog::CatalogSource;

use crate::ecdf::{greater_equal_ecdf, less_equal_ecdf, Ecdf};
use crate::error::{EvaluationError, EvaluationResult};

/// Outcome of a number test, with the data needed to plot its ECDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberTestResult {
    pub forecast_name: Option<String>,
    pub observation_name: Option<String>,
    pub observed_count: usize,
    /// Simulated event counts, ascending.
    pub simulated_counts: Vec<usize>,
    pub ecdf: Ecdf,
    /// `P(X >= observed_count)`.
    pub delta1: f64,
    /// `P(X <= observed_count)`.
    pub delta2: f64,
}

impl NumberTestResult {
    pub fn with_names(
        mut self,
        forecast: impl Into<String>,
        observation: impl Into<String>,
    ) -> Self {
        self.forecast_name = Some(forecast.into());
        self.observation_name = Some(observation.into());
        self
    }

    pub fn simulations(&self) -> usize {
        self.simulated_counts.len()
    }
}

impl fmt::Display for NumberTestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N-Test {} vs {}: observed {} events, {} simulations, delta1 = {:.4}, delta2 = {:.4}",
            self.forecast_name.as_deref().unwrap_or("forecast"),
            self.observation_name.as_deref().unwrap_or("observation"),
            self.observed_count,
            self.simulated_counts.len(),
            self.delta1,
            self.delta2
        )
    }
}

/// Number test over precomputed simulated counts.
pub fn number_test_counts(
    simulated_counts: &[usize],
    observed_count: usize,
) -> EvaluationResult<NumberTestResult> {
    if simulated_counts.is_empty() {
        return Err(EvaluationError::EmptyEnsemble);
    }
    let mut sorted = simulated_counts.to_vec();
    sorted.sort_unstable();

    let sample: Vec<f64> = sorted.iter().map(|&c| c as f64).collect();
    let observed = observed_count as f64;
    let delta1 = greater_equal_ecdf(&sample, observed).ok_or(EvaluationError::EmptyEnsemble)?;
    let delta2 = less_equal_ecdf(&sample, observed).ok_or(EvaluationError::EmptyEnsemble)?;

    info!(
        observed = observed_count,
        simulations = sorted.len(),
        delta1,
        delta2,
        "number test"
    );
    Ok(NumberTestResult {
        forecast_name: None,
        observation_name: None,
        observed_count,
        ecdf: Ecdf::new(&sample),
        simulated_counts: sorted,
        delta1,
        delta2,
    })
}

/// Number test of an ensemble of catalogs against an observed catalog.
pub fn number_test<I, O>(ensemble: I, observation: &O) -> EvaluationResult<NumberTestResult>
where
    I: IntoIterator,
    I::Item: CatalogSource,
    O: CatalogSource + ?Sized,
{
    let counts: Vec<usize> = ensemble.into_iter().map(|c| c.event_count()).collect();
    number_test_counts(&counts, observation.event_count())
}

/// Number test over a fallible stream of catalogs, such as an ensemble reader.
///
/// The first decode error aborts the test.
pub fn number_test_stream<I, C, E, O>(
    ensemble: I,
    observation: &O,
) -> EvaluationResult<NumberTestResult>
where
    I: IntoIterator<Item = Result<C, E>>,
    C: CatalogSource,
    E: Into<EvaluationError>,
    O: CatalogSource + ?Sized,
{
    let counts = ensemble
        .into_iter()
        .map(|item| item.map(|c| c.event_count()).map_err(Into::into))
        .collect::<EvaluationResult<Vec<usize>>>()?;
    number_test_counts(&counts, observation.event_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_catalog::{
        CanonicalRecord, Catalog, CatalogOptions, CatalogResult, OriginTimeUnit, RuptureRecord,
    };
    use quake_ensemble::{encode_ensemble, EnsembleConfig, EnsembleError, EnsembleReader};

    /// Catalog stand-in that only knows its size.
    struct Counted(usize);

    impl CatalogSource for Counted {
        fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
            Ok(Vec::new())
        }
        fn event_count(&self) -> usize {
            self.0
        }
        fn magnitudes(&self) -> Vec<f64> {
            Vec::new()
        }
        fn epoch_times(&self) -> Vec<f64> {
            Vec::new()
        }
        fn latitudes(&self) -> Vec<f64> {
            Vec::new()
        }
        fn longitudes(&self) -> Vec<f64> {
            Vec::new()
        }
    }

    fn rupture(id: i32) -> RuptureRecord {
        RuptureRecord {
            rupture_id: id,
            parent_id: -1,
            generation: 0,
            origin_time: 1_600_000_000_000,
            latitude: 36.0,
            longitude: -120.0,
            depth: 6.0,
            magnitude: 3.0,
            dist_to_parent: 0.0,
            erf_index: -1,
            fss_index: -1,
            grid_node_index: 0,
        }
    }

    #[test]
    fn reference_sample() {
        let result = number_test_counts(&[1, 2, 2, 3, 5], 2).unwrap();
        assert_eq!(result.delta1, 0.8);
        assert_eq!(result.delta2, 0.6);
        assert_eq!(result.simulated_counts, vec![1, 2, 2, 3, 5]);
        assert_eq!(result.ecdf.x, vec![1.0, 2.0, 3.0, 5.0]);
        assert_eq!(result.ecdf.y, vec![0.2, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn observation_at_sample_extremes() {
        let at_min = number_test_counts(&[4, 1, 3, 9], 1).unwrap();
        assert_eq!(at_min.delta2, 0.25);
        assert_eq!(at_min.delta1, 1.0);

        let at_max = number_test_counts(&[4, 1, 3, 9], 9).unwrap();
        assert_eq!(at_max.delta1, 0.25);
        assert_eq!(at_max.delta2, 1.0);

        let below = number_test_counts(&[4, 1, 3, 9], 0).unwrap();
        assert_eq!((below.delta1, below.delta2), (1.0, 0.0));
    }

    #[test]
    fn empty_ensemble_is_an_error() {
        assert!(matches!(
            number_test_counts(&[], 3),
            Err(EvaluationError::EmptyEnsemble)
        ));
        let none: Vec<Counted> = Vec::new();
        assert!(number_test(none, &Counted(1)).is_err());
    }

    #[test]
    fn counts_catalogs_of_any_kind() {
        let ensemble = vec![Counted(1), Counted(2), Counted(2), Counted(3), Counted(5)];
        let result = number_test(&ensemble, &Counted(2)).unwrap();
        assert_eq!((result.delta1, result.delta2), (0.8, 0.6));

        let observed = Catalog::synthetic(
            vec![rupture(1), rupture(2)],
            OriginTimeUnit::Milliseconds,
            CatalogOptions::new(),
        )
        .unwrap();
        let result = number_test(&ensemble, &observed).unwrap();
        assert_eq!(result.observed_count, 2);
    }

    #[test]
    fn streams_from_ensemble_reader() {
        let sections: Vec<(i16, Vec<RuptureRecord>)> = [1, 2, 2, 3, 5]
            .iter()
            .map(|&n| (1, (0..n).map(rupture).collect()))
            .collect();
        let bytes = encode_ensemble(&sections).unwrap();
        let reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();

        let result = number_test_stream(reader, &Counted(2))
            .unwrap()
            .with_names("ucerf3-etas", "comcat");
        assert_eq!((result.delta1, result.delta2), (0.8, 0.6));
        assert!(result
            .to_string()
            .starts_with("N-Test ucerf3-etas vs comcat: observed 2 events, 5 simulations"));
    }

    #[test]
    fn decode_error_aborts_stream() {
        let mut bytes = encode_ensemble(&[(1, vec![rupture(1)]), (1, vec![rupture(2)])]).unwrap();
        bytes.truncate(bytes.len() - 1);
        let reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();

        let err = number_test_stream(reader, &Counted(1)).unwrap_err();
        assert!(matches!(err, EvaluationError::Ensemble(EnsembleError::TruncatedFile { .. })));
    }
}
