//! Loads the index series into an immutable catalog.
//!
//! The FOI series published by ISTAT ships with the binary; a
//! `catalog_path` in the config replaces it with an external file of the
//! same shape. Loading happens once at startup, the core never re-reads it.

use crate::core::catalog::{IndexPeriod, PeriodCatalog};
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::fs;
use tracing::debug;

const DEFAULT_DATASET: &str = include_str!("../../data/indici_foi.json");

pub fn load_catalog(config: &AppConfig) -> Result<PeriodCatalog> {
    let records = match &config.catalog_path {
        Some(path) => {
            debug!("Loading index catalog from {path}");
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog file: {path}"))?;
            parse_records(&raw)
                .with_context(|| format!("Failed to parse catalog file: {path}"))?
        }
        None => {
            debug!("Loading bundled index catalog");
            parse_records(DEFAULT_DATASET).context("Bundled catalog is invalid")?
        }
    };

    let catalog = PeriodCatalog::new(records).context("Index catalog is unusable")?;
    debug!(
        periods = catalog.periods().len(),
        "Loaded index catalog {} - {}",
        catalog.earliest().description,
        catalog.latest().description
    );
    Ok(catalog)
}

fn parse_records(raw: &str) -> Result<Vec<IndexPeriod>> {
    serde_json::from_str(raw).map_err(Into::into)
}
