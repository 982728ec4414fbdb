//! Index period catalog and lookups

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single entry of the consumer price index series.
///
/// `index_from` is the index value effective at the start of the period,
/// `index_to` the value effective at its end. The inflation fields are
/// informational and not used by the revaluation formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPeriod {
    pub id: u32,
    pub description: String,
    pub year: i32,
    pub month: u32,
    pub index_from: f64,
    pub index_to: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_inflation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_inflation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_inflation: Option<f64>,
}

impl IndexPeriod {
    /// Absolute position of this period on the month axis.
    pub(crate) fn month_ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("index catalog contains no periods")]
    Empty,
    #[error("duplicate catalog entry for {month:02}/{year}")]
    DuplicatePeriod { year: i32, month: u32 },
}

/// An immutable view over the index series, sorted ascending by
/// (year, month) and guaranteed non-empty with unique periods.
///
/// Construct one at startup and share it; catalog, resolver and calculator
/// hold references instead of reaching for ambient state.
#[derive(Debug, Clone)]
pub struct PeriodCatalog {
    periods: Vec<IndexPeriod>,
}

impl PeriodCatalog {
    pub fn new(mut periods: Vec<IndexPeriod>) -> Result<Self, CatalogError> {
        if periods.is_empty() {
            return Err(CatalogError::Empty);
        }

        periods.sort_by_key(IndexPeriod::month_ordinal);
        for pair in periods.windows(2) {
            if pair[0].month_ordinal() == pair[1].month_ordinal() {
                return Err(CatalogError::DuplicatePeriod {
                    year: pair[1].year,
                    month: pair[1].month,
                });
            }
        }

        Ok(Self { periods })
    }

    /// All periods, ascending by (year, month).
    pub fn periods(&self) -> &[IndexPeriod] {
        &self.periods
    }

    /// The unique period matching (year, month), if present. An exact miss
    /// is an expected case; callers fall back to the resolver.
    pub fn find_exact(&self, year: i32, month: u32) -> Option<&IndexPeriod> {
        let ordinal = i64::from(year) * 12 + i64::from(month);
        self.periods
            .binary_search_by_key(&ordinal, IndexPeriod::month_ordinal)
            .ok()
            .map(|i| &self.periods[i])
    }

    /// The most recent period in the catalog. Revaluations always target
    /// this period's `index_to`.
    pub fn latest(&self) -> &IndexPeriod {
        self.periods
            .last()
            .expect("catalog is non-empty by construction")
    }

    /// The oldest period in the catalog.
    pub fn earliest(&self) -> &IndexPeriod {
        self.periods
            .first()
            .expect("catalog is non-empty by construction")
    }
}
