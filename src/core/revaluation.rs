//! Revaluation arithmetic over the index catalog

use crate::core::catalog::PeriodCatalog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum RevaluationError {
    /// The amount is not a positive finite number. Surfaced directly to the
    /// user; the input layer should have caught this already.
    #[error("amount must be a positive finite number, got {0}")]
    InvalidAmount(f64),
    /// The start period is absent from the catalog. Callers are expected to
    /// resolve dates first; this is a contract violation, never a silent
    /// fallback.
    #[error("no index period found for {month:02}/{year}")]
    PeriodNotFound { year: i32, month: u32 },
    /// The start period carries a non-positive index. Corrupt catalog data;
    /// the calculation aborts instead of producing a division artifact.
    #[error("corrupt catalog: non-positive index for {month:02}/{year}")]
    CorruptCatalog { year: i32, month: u32 },
}

/// Outcome of a single revaluation. Immutable once produced; numeric fields
/// are IEEE-754 doubles and timestamps serialize as ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevaluationResult {
    pub original_amount: f64,
    pub revalued_amount: f64,
    pub difference: f64,
    pub percent_change: f64,
    pub start_period: String,
    pub end_period: String,
    pub start_index: f64,
    pub end_index: f64,
    pub computed_at: DateTime<Utc>,
}

/// Computes present-day purchasing power for a past amount.
///
/// The calculation always revalues to the most recent period available in
/// the catalog, never to an arbitrary end date. The calculator trusts
/// nothing: it re-checks the amount and the start period even though the
/// input layer and the resolver normally guarantee both.
pub struct RevaluationCalculator {
    catalog: Arc<PeriodCatalog>,
}

impl RevaluationCalculator {
    pub fn new(catalog: Arc<PeriodCatalog>) -> Self {
        Self { catalog }
    }

    /// Revalues `amount` from (year, month) to the latest catalog period.
    ///
    /// Formula: `revalued = amount * (end_index / start_index)` where
    /// `start_index` is the start period's `index_from` and `end_index` the
    /// latest period's `index_to`.
    pub fn calculate(
        &self,
        amount: f64,
        year: i32,
        month: u32,
    ) -> Result<RevaluationResult, RevaluationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RevaluationError::InvalidAmount(amount));
        }

        let start = self
            .catalog
            .find_exact(year, month)
            .ok_or(RevaluationError::PeriodNotFound { year, month })?;
        let latest = self.catalog.latest();

        let start_index = start.index_from;
        let end_index = latest.index_to;
        if start_index <= 0.0 {
            return Err(RevaluationError::CorruptCatalog { year, month });
        }

        let revalued_amount = amount * (end_index / start_index);
        let difference = revalued_amount - amount;
        let percent_change = difference / amount * 100.0;

        debug!(
            amount,
            start_index,
            end_index,
            revalued_amount,
            "Revalued {} -> {}",
            start.description,
            latest.description
        );

        Ok(RevaluationResult {
            original_amount: amount,
            revalued_amount,
            difference,
            percent_change,
            start_period: start.description.clone(),
            end_period: latest.description.clone(),
            start_index,
            end_index,
            computed_at: Utc::now(),
        })
    }
}
