//! Application state for the earned wage access API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::SalaryEngine;
use crate::config::RateTableCache;

/// Shared application state.
///
/// Holds the rate table cache and the engine every handler calculates with.
#[derive(Debug, Clone)]
pub struct AppState {
    cache: Arc<RateTableCache>,
    engine: SalaryEngine,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(cache: RateTableCache, engine: SalaryEngine) -> Self {
        Self {
            cache: Arc::new(cache),
            engine,
        }
    }

    /// Returns the rate table cache.
    pub fn cache(&self) -> &RateTableCache {
        &self.cache
    }

    /// Returns the calculation engine.
    pub fn engine(&self) -> SalaryEngine {
        self.engine
    }
}
