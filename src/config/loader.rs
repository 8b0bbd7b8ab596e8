//! Rate table loading functionality.
//!
//! This module provides the [`RateTableLoader`] type, which resolves a
//! country code through a [`RateSource`], adapts the spreadsheet export and
//! validates the result into a [`RateTable`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};

use super::sheet::{parse_rates_sheet, SkippedRow};
use super::source::{normalize_country_code, DirectorySource, RateSource};
use super::types::RateTable;

/// Default upper bound on how long a single load may take.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(2);

/// A freshly loaded rate table together with the rows that were dropped.
#[derive(Debug, Clone)]
pub struct LoadedRateTable {
    /// The normalised country code.
    pub country: String,
    /// The validated table.
    pub table: RateTable,
    /// Sheet rows that were skipped while parsing.
    pub skipped_rows: Vec<SkippedRow>,
}

/// Loads per-country rate tables.
///
/// # Example
///
/// ```no_run
/// use ewa_engine::config::RateTableLoader;
///
/// # async fn run() -> ewa_engine::error::EngineResult<()> {
/// let loader = RateTableLoader::from_dir("./config/rates");
/// let loaded = loader.load("KE").await?;
/// println!("{} flat rates, {} bands", loaded.table.flat_rates().len(), loaded.table.bands().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RateTableLoader {
    source: Arc<dyn RateSource>,
    timeout: Duration,
}

impl RateTableLoader {
    /// Creates a loader over the given source with the default timeout.
    pub fn new<S: RateSource + 'static>(source: S) -> Self {
        Self {
            source: Arc::new(source),
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Creates a loader reading `<dir>/<CC>.json` files.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(DirectorySource::new(dir))
    }

    /// Sets the load timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the load timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Loads the rate table for `country_code`.
    ///
    /// The source is read on a blocking worker and abandoned if it does not
    /// answer within the timeout.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] if the code is malformed or has no document
    /// - [`EngineError::ConfigUnavailable`] if the document cannot be read, parsed,
    ///   or validated, or the read times out
    pub async fn load(&self, country_code: &str) -> EngineResult<LoadedRateTable> {
        let country = normalize_country_code(country_code)?;

        let source = Arc::clone(&self.source);
        let fetch_country = country.clone();
        let fetch = tokio::task::spawn_blocking(move || source.fetch(&fetch_country));

        let document = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                return Err(EngineError::ConfigUnavailable {
                    country,
                    message: format!("rate source task failed: {}", join_error),
                });
            }
            Err(_) => {
                warn!(
                    country = %country,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Rate table load timed out"
                );
                return Err(EngineError::ConfigUnavailable {
                    message: format!("timed out after {} ms", self.timeout.as_millis()),
                    country,
                });
            }
        };

        Self::parse(&country, &document)
    }

    /// Builds a validated table from an already fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigUnavailable`] if the `"Rates"` sheet is
    /// missing or its contents break a [`RateTable`] invariant.
    pub fn parse(country: &str, document: &Value) -> EngineResult<LoadedRateTable> {
        let parsed = parse_rates_sheet(country, document)?;

        for row in &parsed.skipped {
            warn!(
                country = %country,
                row = row.index,
                reason = %row.reason,
                "Skipped rate sheet row"
            );
        }

        let table = RateTable::new(parsed.flat_rates, parsed.bands).map_err(|e| {
            EngineError::ConfigUnavailable {
                country: country.to_string(),
                message: e.to_string(),
            }
        })?;

        info!(
            country = %country,
            flat_rates = table.flat_rates().len(),
            bands = table.bands().len(),
            skipped_rows = parsed.skipped.len(),
            "Loaded rate table"
        );

        Ok(LoadedRateTable {
            country: country.to_string(),
            table,
            skipped_rows: parsed.skipped,
        })
    }
}

impl std::fmt::Debug for RateTableLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateTableLoader")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
