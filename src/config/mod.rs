//! Rate configuration loading and management.
//!
//! This module turns per-country spreadsheet exports into validated
//! [`RateTable`]s, caches them, and holds the versioned fallback constants
//! and service settings.
//!
//! # Example
//!
//! ```no_run
//! use ewa_engine::config::{RateTableCache, RateTableLoader};
//!
//! # async fn run() -> ewa_engine::error::EngineResult<()> {
//! let cache = RateTableCache::new(RateTableLoader::from_dir("./config/rates"), None);
//! let table = cache.get("KE").await?;
//! println!("NSSF rate: {:?}", table.flat_rate("NSSF Rate"));
//! # Ok(())
//! # }
//! ```

mod cache;
mod defaults;
pub mod keys;
mod loader;
mod settings;
mod sheet;
mod source;
mod types;

pub use cache::RateTableCache;
pub use defaults::{CURRENT_FALLBACKS, CalculationProfile, FallbackRates, LEGACY_FALLBACKS};
pub use loader::{DEFAULT_LOAD_TIMEOUT, LoadedRateTable, RateTableLoader};
pub use settings::EngineSettings;
pub use sheet::{ParsedSheet, SkippedRow, parse_rates_sheet};
pub use source::{DirectorySource, RateSource, StaticSource, normalize_country_code};
pub use types::{Band, RateTable};
