//! In-memory rate table cache.
//!
//! The cache is an explicit object owned by whoever serves requests. Entries
//! expire after an optional time-to-live and can be dropped on redeploy with
//! [`RateTableCache::invalidate_all`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::EngineResult;

use super::loader::RateTableLoader;
use super::source::normalize_country_code;
use super::types::RateTable;

#[derive(Debug, Clone)]
struct CacheEntry {
    table: Arc<RateTable>,
    loaded_at: Instant,
}

/// Caches loaded rate tables by country code.
///
/// Concurrent misses for the same country may each load the table; the last
/// one to finish wins. Failed loads are never cached.
#[derive(Debug)]
pub struct RateTableCache {
    loader: RateTableLoader,
    ttl: Option<Duration>,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl RateTableCache {
    /// Creates a cache. A `ttl` of `None` keeps entries for the process lifetime.
    pub fn new(loader: RateTableLoader, ttl: Option<Duration>) -> Self {
        Self {
            loader,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the configured time-to-live.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the table for `country_code`, loading it on a miss or expiry.
    ///
    /// # Errors
    ///
    /// Propagates [`RateTableLoader::load`] failures.
    pub async fn get(&self, country_code: &str) -> EngineResult<Arc<RateTable>> {
        let country = normalize_country_code(country_code)?;

        if let Some(table) = self.fresh_entry(&country) {
            debug!(country = %country, "Rate table cache hit");
            return Ok(table);
        }

        let loaded = self.loader.load(&country).await?;
        let table = Arc::new(loaded.table);

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                country,
                CacheEntry {
                    table: Arc::clone(&table),
                    loaded_at: Instant::now(),
                },
            );

        Ok(table)
    }

    /// Drops the entry for `country_code`, if any.
    pub fn invalidate(&self, country_code: &str) {
        if let Ok(country) = normalize_country_code(country_code) {
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&country);
        }
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns the number of cached entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh_entry(&self, country: &str) -> Option<Arc<RateTable>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(country)?;
        let fresh = self
            .ttl
            .is_none_or(|ttl| entry.loaded_at.elapsed() < ttl);
        fresh.then(|| Arc::clone(&entry.table))
    }
}
