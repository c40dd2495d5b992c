//! Magnitude-frequency distribution and Gutenberg-Richter regression.
//!
//! Bins are upper-edge inclusive intervals `(lo, hi]` with edges running from
//! `min - bin_width / 2` up to, but excluding, `max + bin_width`. Counts are
//! accumulated from the largest magnitude down, and `log10(cumulative)` is
//! fitted against bin midpoints over the bins with a nonzero cumulative count.

use serde::{Deserialize, Serialize};
use tracing::debug;

use quake_catalog::CatalogSource;
use quake_types::CatalogError;

use crate::config::{MfdConfig, MAX_BINS};
use crate::distribution::student_t_quantile;
use crate::error::{StatisticsError, StatisticsResult};
use crate::regression::ordinary_least_squares;

/// Fewest bins (and fewest nonzero bins) for which a regression is attempted.
pub const MIN_REGRESSION_BINS: usize = 3;

/// Regression summary shared by every nonzero bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GutenbergRichterFit {
    /// Intercept of `log10(N) = a + b * m`.
    pub a: f64,
    /// Slope of `log10(N) = a + b * m`; negative for a decaying distribution.
    pub b: f64,
    /// Half-width of the confidence interval on `b`.
    pub b_value_ci: f64,
    /// Student-t critical value used for the bands.
    pub t_stat: f64,
    /// Standard error of the regression line.
    pub se_line: f64,
    /// Number of bins the line was fitted over.
    pub n_bins: usize,
}

impl GutenbergRichterFit {
    /// Conventional positive b-value, `-b`.
    pub fn b_value(&self) -> f64 {
        -self.b
    }
}

/// One magnitude bin with its counts and, where defined, regression outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfdBin {
    pub lower_edge: f64,
    pub upper_edge: f64,
    pub midpoint: f64,
    /// Events falling in `(lower_edge, upper_edge]`.
    pub count: usize,
    /// Events in this bin or any higher one.
    pub cumulative_count: usize,
    pub log10_count: Option<f64>,
    pub fitted_log10_count: Option<f64>,
    pub lower_ci: Option<f64>,
    pub upper_ci: Option<f64>,
    pub t_stat: Option<f64>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub b_value_ci: Option<f64>,
}

impl MfdBin {
    fn new(lower_edge: f64, upper_edge: f64, count: usize, cumulative_count: usize) -> Self {
        Self {
            lower_edge,
            upper_edge,
            midpoint: 0.5 * (lower_edge + upper_edge),
            count,
            cumulative_count,
            log10_count: None,
            fitted_log10_count: None,
            lower_ci: None,
            upper_ci: None,
            t_stat: None,
            a: None,
            b: None,
            b_value_ci: None,
        }
    }
}

/// Binned counts of a catalog plus the fitted Gutenberg-Richter line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeFrequencyDistribution {
    pub bin_width: f64,
    pub confidence_level: f64,
    pub bins: Vec<MfdBin>,
    /// `None` when too few bins exist or the midpoints have no spread.
    pub fit: Option<GutenbergRichterFit>,
}

impl MagnitudeFrequencyDistribution {
    pub fn is_degenerate(&self) -> bool {
        self.fit.is_none()
    }

    pub fn midpoints(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.midpoint).collect()
    }

    pub fn cumulative_counts(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.cumulative_count).collect()
    }

    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self.bins.iter().map(|b| b.lower_edge).collect();
        edges.extend(self.bins.last().map(|b| b.upper_edge));
        edges
    }
}

/// Magnitude-frequency distribution of `catalog` with explicit parameters.
///
/// Non-finite magnitudes are ignored. Fails on invalid parameters or when the
/// catalog holds no finite magnitude; a degenerate regression is not an error.
pub fn compute_magnitude_frequency_distribution<C>(
    catalog: &C,
    bin_width: f64,
    confidence_level: f64,
) -> StatisticsResult<MagnitudeFrequencyDistribution>
where
    C: CatalogSource + ?Sized,
{
    let config = MfdConfig::new(bin_width, confidence_level)?;
    compute_magnitude_frequency_distribution_with(catalog, &config)
}

pub fn compute_magnitude_frequency_distribution_with<C>(
    catalog: &C,
    config: &MfdConfig,
) -> StatisticsResult<MagnitudeFrequencyDistribution>
where
    C: CatalogSource + ?Sized,
{
    config.validate()?;
    let magnitudes: Vec<f64> = catalog
        .magnitudes()
        .into_iter()
        .filter(|m| m.is_finite())
        .collect();
    if magnitudes.is_empty() {
        return Err(CatalogError::EmptyCatalog.into());
    }

    let edges = bin_edges(&magnitudes, config.bin_width)?;
    let counts = bin_counts(&magnitudes, &edges);
    let cumulative = cumulative_from_top(&counts);

    let mut bins: Vec<MfdBin> = edges
        .windows(2)
        .zip(counts.iter().zip(&cumulative))
        .map(|(edge, (&count, &cum))| MfdBin::new(edge[0], edge[1], count, cum))
        .collect();

    let fit = if bins.len() < MIN_REGRESSION_BINS {
        debug!(bins = bins.len(), "too few magnitude bins for regression");
        None
    } else {
        fit_gutenberg_richter(&mut bins, config.confidence_level)?
    };

    Ok(MagnitudeFrequencyDistribution {
        bin_width: config.bin_width,
        confidence_level: config.confidence_level,
        bins,
        fit,
    })
}

fn bin_edges(magnitudes: &[f64], bin_width: f64) -> StatisticsResult<Vec<f64>> {
    let (min, max) = magnitudes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| (lo.min(m), hi.max(m)));
    let start = min - bin_width / 2.0;
    let stop = max + bin_width;
    let steps = ((stop - start) / bin_width).ceil();
    if !steps.is_finite() || steps > (MAX_BINS + 1) as f64 {
        return Err(StatisticsError::invalid(
            "bin_width",
            bin_width,
            format!("magnitude range {min}..{max} needs more than {MAX_BINS} bins"),
        ));
    }
    let mut edges: Vec<f64> = (0..steps as usize)
        .map(|k| start + k as f64 * bin_width)
        .collect();
    // Rounding can leave the top edge a hair below the maximum.
    if edges.last().is_some_and(|&top| top < max) {
        edges.push(start + edges.len() as f64 * bin_width);
    }
    Ok(edges)
}

// Upper-edge inclusive: a value equal to an edge belongs to the bin below it.
fn bin_counts(magnitudes: &[f64], edges: &[f64]) -> Vec<usize> {
    let mut counts = vec![0usize; edges.len().saturating_sub(1)];
    for &m in magnitudes {
        let upper = edges.partition_point(|&e| e < m);
        if upper >= 1 && upper < edges.len() {
            counts[upper - 1] += 1;
        }
    }
    counts
}

fn cumulative_from_top(counts: &[usize]) -> Vec<usize> {
    let mut cumulative: Vec<usize> = counts
        .iter()
        .rev()
        .scan(0usize, |running, &c| {
            *running += c;
            Some(*running)
        })
        .collect();
    cumulative.reverse();
    cumulative
}

fn fit_gutenberg_richter(
    bins: &mut [MfdBin],
    confidence_level: f64,
) -> StatisticsResult<Option<GutenbergRichterFit>> {
    for bin in bins.iter_mut().filter(|b| b.cumulative_count > 0) {
        bin.log10_count = Some((bin.cumulative_count as f64).log10());
    }

    let (x, y): (Vec<f64>, Vec<f64>) = bins
        .iter()
        .filter_map(|b| b.log10_count.map(|n| (b.midpoint, n)))
        .unzip();
    let n = x.len();
    if n < MIN_REGRESSION_BINS {
        debug!(nonzero_bins = n, "too few nonzero magnitude bins for regression");
        return Ok(None);
    }
    let Some(line) = ordinary_least_squares(&x, &y) else {
        debug!(nonzero_bins = n, "magnitude bins have no spread");
        return Ok(None);
    };

    let dof = (n - 2) as f64;
    let t_stat = student_t_quantile(1.0 - confidence_level / 2.0, dof)?;
    let se_line = (line.residual_sum_of_squares() / dof).sqrt();
    let b_value_ci = t_stat * line.rms() / line.sxx;

    for bin in bins.iter_mut().filter(|b| b.log10_count.is_some()) {
        let fitted = line.predict(bin.midpoint);
        let dx = bin.midpoint - line.mean_x;
        let half_width = t_stat * se_line * (1.0 / n as f64 + dx * dx / line.sxx).sqrt();
        bin.fitted_log10_count = Some(fitted);
        bin.lower_ci = Some(fitted - half_width);
        bin.upper_ci = Some(fitted + half_width);
        bin.t_stat = Some(t_stat);
        bin.a = Some(line.intercept);
        bin.b = Some(line.slope);
        bin.b_value_ci = Some(b_value_ci);
    }

    debug!(
        a = line.intercept,
        b = line.slope,
        b_value_ci,
        nonzero_bins = n,
        "fitted magnitude-frequency regression"
    );
    Ok(Some(GutenbergRichterFit {
        a: line.intercept,
        b: line.slope,
        b_value_ci,
        t_stat,
        se_line,
        n_bins: n,
    }))
}
