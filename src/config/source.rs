//! Country rate document sources.
//!
//! A [`RateSource`] resolves a country code to the raw JSON document exported
//! from the rates workbook. The loader never touches files directly; it asks
//! a source.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{EngineError, EngineResult};

/// Resolves country codes to rate documents.
///
/// Implementations must be thread-safe because the loader reads from them on
/// a blocking worker thread.
pub trait RateSource: Send + Sync {
    /// Fetches the document for `country`, an already normalised code.
    ///
    /// # Errors
    ///
    /// [`EngineError::ConfigNotFound`] when no document exists for the code,
    /// [`EngineError::ConfigUnavailable`] when it exists but cannot be read.
    fn fetch(&self, country: &str) -> EngineResult<Value>;
}

/// Normalises a country code to two uppercase ASCII letters.
///
/// Anything else cannot name a configuration, so it is reported as
/// [`EngineError::ConfigNotFound`].
///
/// # Example
///
/// ```
/// use ewa_engine::config::normalize_country_code;
///
/// assert_eq!(normalize_country_code(" ke ").unwrap(), "KE");
/// assert!(normalize_country_code("../etc").is_err());
/// ```
pub fn normalize_country_code(code: &str) -> EngineResult<String> {
    let trimmed = code.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(EngineError::ConfigNotFound {
            country: trimmed.to_string(),
        })
    }
}

/// Reads `<dir>/<CC>.json` files.
///
/// ```text
/// config/rates/
/// ├── KE.json
/// └── UG.json
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the path the document for `country` would be read from.
    pub fn path_for(&self, country: &str) -> PathBuf {
        self.dir.join(format!("{}.json", country))
    }
}

impl RateSource for DirectorySource {
    fn fetch(&self, country: &str) -> EngineResult<Value> {
        let path = self.path_for(country);

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => EngineError::ConfigNotFound {
                country: country.to_string(),
            },
            _ => EngineError::ConfigUnavailable {
                country: country.to_string(),
                message: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        serde_json::from_str(&content).map_err(|e| EngineError::ConfigUnavailable {
            country: country.to_string(),
            message: format!("failed to parse {}: {}", path.display(), e),
        })
    }
}

/// Serves documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, Value>,
}

impl StaticSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document for `country`, replacing any previous one.
    pub fn with_document(mut self, country: &str, document: Value) -> Self {
        self.documents
            .insert(country.trim().to_ascii_uppercase(), document);
        self
    }
}

impl RateSource for StaticSource {
    fn fetch(&self, country: &str) -> EngineResult<Value> {
        self.documents
            .get(country)
            .cloned()
            .ok_or_else(|| EngineError::ConfigNotFound {
                country: country.to_string(),
            })
    }
}
