//! Nearest-period resolution for dates outside the catalog

use crate::core::catalog::{IndexPeriod, PeriodCatalog};
use std::sync::Arc;
use tracing::debug;

/// Maps an arbitrary (year, month) request onto the closest period actually
/// present in the catalog.
///
/// Resolution never fails: the catalog is non-empty, so a nearest period
/// always exists. The resolver is pure and stateless; callers that react to
/// resolution results may remember the last resolved key to skip redundant
/// downstream work.
pub struct PeriodResolver {
    catalog: Arc<PeriodCatalog>,
}

impl PeriodResolver {
    pub fn new(catalog: Arc<PeriodCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolves (year, month) to a period present in the catalog.
    ///
    /// An exact match is returned unchanged. Otherwise a linear scan keeps
    /// the candidate with the strictly smallest absolute month distance;
    /// equal distance never replaces the running best, so the earlier
    /// catalog entry wins a tie between two equidistant periods.
    pub fn resolve(&self, year: i32, month: u32) -> (i32, u32) {
        if let Some(exact) = self.catalog.find_exact(year, month) {
            return (exact.year, exact.month);
        }

        let periods = self.catalog.periods();
        let mut best = &periods[0];
        let mut best_distance = month_distance(best, year, month);
        for candidate in &periods[1..] {
            let distance = month_distance(candidate, year, month);
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }

        debug!(
            requested = %format!("{month:02}/{year}"),
            resolved = %format!("{:02}/{}", best.month, best.year),
            "Resolved to nearest available period"
        );
        (best.year, best.month)
    }
}

fn month_distance(period: &IndexPeriod, year: i32, month: u32) -> i64 {
    ((i64::from(period.year) - i64::from(year)) * 12 + (i64::from(period.month) - i64::from(month)))
        .abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::tests::{catalog, period};

    fn resolver(periods: Vec<IndexPeriod>) -> PeriodResolver {
        PeriodResolver::new(Arc::new(catalog(periods)))
    }

    #[test]
    fn exact_period_is_returned_unchanged() {
        let resolver = resolver(vec![
            period(1, 2020, 1, 100.0, 100.5),
            period(2, 2020, 6, 101.0, 101.2),
        ]);
        assert_eq!(resolver.resolve(2020, 6), (2020, 6));
    }

    #[test]
    fn resolves_to_minimum_month_distance() {
        let resolver = resolver(vec![
            period(1, 2010, 1, 100.0, 100.5),
            period(2, 2020, 3, 110.0, 110.5),
        ]);

        // 2019-11 is 4 months from 2020-03 and far from 2010-01.
        assert_eq!(resolver.resolve(2019, 11), (2020, 3));
        // Before the catalog starts, the earliest period is closest.
        assert_eq!(resolver.resolve(2005, 7), (2010, 1));
        // After the catalog ends, the latest period is closest.
        assert_eq!(resolver.resolve(2024, 1), (2020, 3));
    }

    #[test]
    fn equidistant_periods_keep_first_candidate() {
        // 2020-03 is exactly two months from both entries; the scan runs in
        // ascending catalog order and equal distance must not replace the
        // running best, so 2020-01 wins.
        let resolver = resolver(vec![
            period(1, 2020, 1, 100.0, 100.5),
            period(2, 2020, 5, 101.0, 101.2),
        ]);
        assert_eq!(resolver.resolve(2020, 3), (2020, 1));
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = resolver(vec![
            period(1, 2018, 2, 100.0, 100.5),
            period(2, 2021, 9, 104.0, 104.5),
        ]);
        let first = resolver.resolve(2019, 12);
        for _ in 0..10 {
            assert_eq!(resolver.resolve(2019, 12), first);
        }
    }
}
