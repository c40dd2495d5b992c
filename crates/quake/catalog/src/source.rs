//! The capability set every catalog variant implements.

use quake_types::{CanonicalRecord, CatalogResult};

/// Read access shared by all catalog representations.
///
/// Column accessors return values in catalog order; `epoch_times` is always
/// in canonical seconds regardless of the variant's stored unit.
pub trait CatalogSource {
    /// Convert the native representation into canonical schema rows.
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>>;

    fn event_count(&self) -> usize;

    fn magnitudes(&self) -> Vec<f64>;

    fn epoch_times(&self) -> Vec<f64>;

    fn latitudes(&self) -> Vec<f64>;

    fn longitudes(&self) -> Vec<f64>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    fn to_canonical_form(&self) -> CatalogResult<Vec<CanonicalRecord>> {
        (**self).to_canonical_form()
    }

    fn event_count(&self) -> usize {
        (**self).event_count()
    }

    fn magnitudes(&self) -> Vec<f64> {
        (**self).magnitudes()
    }

    fn epoch_times(&self) -> Vec<f64> {
        (**self).epoch_times()
    }

    fn latitudes(&self) -> Vec<f64> {
        (**self).latitudes()
    }

    fn longitudes(&self) -> Vec<f64> {
        (**self).longitudes()
    }
}

/// Keep the items whose mask entry is `true`.
pub(crate) fn retain_by_mask<T: Clone>(items: &[T], mask: &[bool]) -> Vec<T> {
    items
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(item, _)| item.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_by_mask_preserves_order() {
        let kept = retain_by_mask(&[10, 20, 30, 40], &[true, false, true, true]);
        assert_eq!(kept, vec![10, 30, 40]);
    }
}
