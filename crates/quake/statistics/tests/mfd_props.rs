//! Property tests: magnitude-frequency bins account for every event and never increase upward.

use chrono::DateTime;
use proptest::prelude::*;
use quake_catalog::{Catalog, CatalogOptions, FeedRecord};
use quake_statistics::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn catalog_of(magnitudes: &[f64]) -> Catalog {
    let events = magnitudes.iter().enumerate().map(|(i, &magnitude)| FeedRecord {
        id: format!("ev{i}"),
        time: DateTime::from_timestamp(1_700_000_000 + i as i64 * 60, 0).unwrap(),
        latitude: 35.0,
        longitude: -118.0,
        depth: 8.0,
        magnitude,
    });
    Catalog::external(events, None, CatalogOptions::new()).unwrap()
}

fn arb_magnitudes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..9.0, 1..200)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Cumulative counts are non-increasing with bin index and start at the event total.
    #[test]
    fn cumulative_counts_non_increasing(
        magnitudes in arb_magnitudes(),
        bin_width in 0.05f64..1.0,
    ) {
        let catalog = catalog_of(&magnitudes);
        let mfd = compute_magnitude_frequency_distribution(&catalog, bin_width, 0.05).unwrap();

        let cumulative = mfd.cumulative_counts();
        prop_assert!(cumulative.windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(cumulative[0], magnitudes.len());
        prop_assert_eq!(mfd.bins.iter().map(|b| b.count).sum::<usize>(), magnitudes.len());
    }

    /// Edges start half a bin below the minimum and cover the maximum.
    #[test]
    fn edges_cover_the_magnitude_range(
        magnitudes in arb_magnitudes(),
        bin_width in 0.05f64..1.0,
    ) {
        let catalog = catalog_of(&magnitudes);
        let mfd = compute_magnitude_frequency_distribution(&catalog, bin_width, 0.05).unwrap();
        let stats = compute_bounding_statistics(&catalog).unwrap();

        let edges = mfd.edges();
        prop_assert!((edges[0] - (stats.min_magnitude - bin_width / 2.0)).abs() < 1e-9);
        prop_assert!(*edges.last().unwrap() >= stats.max_magnitude);
        prop_assert!(*edges.last().unwrap() < stats.max_magnitude + bin_width);
    }

    /// Regression fields are all present or all absent on every bin.
    #[test]
    fn regression_fields_are_consistent(
        magnitudes in arb_magnitudes(),
        bin_width in 0.05f64..1.0,
    ) {
        let catalog = catalog_of(&magnitudes);
        let mfd = compute_magnitude_frequency_distribution(&catalog, bin_width, 0.05).unwrap();
        for bin in &mfd.bins {
            prop_assert_eq!(bin.a.is_some(), mfd.fit.is_some());
            prop_assert_eq!(bin.b.is_some(), bin.lower_ci.is_some());
            if let (Some(lo), Some(hi)) = (bin.lower_ci, bin.upper_ci) {
                prop_assert!(lo <= hi);
            }
        }
        if mfd.bins.len() < 3 {
            prop_assert!(mfd.is_degenerate());
        }
    }
}
