//! Service settings.
//!
//! Settings are read from a YAML file:
//!
//! ```yaml
//! rates_dir: ./config/rates
//! cache_ttl_secs: 300
//! load_timeout_ms: 2000
//! profile: current
//! bind_address: 0.0.0.0:8080
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

use super::cache::RateTableCache;
use super::defaults::CalculationProfile;
use super::loader::RateTableLoader;

fn default_rates_dir() -> PathBuf {
    PathBuf::from("./config/rates")
}

fn default_load_timeout_ms() -> u64 {
    2000
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Settings for the rate loader, cache, engine profile and HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    /// Directory holding `<CC>.json` rate documents.
    #[serde(default = "default_rates_dir")]
    pub rates_dir: PathBuf,
    /// Cache time-to-live in seconds. Absent means cache until restart.
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
    /// Timeout for a single rate table load, in milliseconds.
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
    /// Which calculation profile to apply.
    #[serde(default)]
    pub profile: CalculationProfile,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rates_dir: default_rates_dir(),
            cache_ttl_secs: None,
            load_timeout_ms: default_load_timeout_ms(),
            profile: CalculationProfile::default(),
            bind_address: default_bind_address(),
        }
    }
}

impl EngineSettings {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SettingsError`] if the file cannot be read or
    /// is not valid settings YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path_str = path.as_ref().display().to_string();

        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| EngineError::SettingsError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        Self::from_yaml(&content).map_err(|message| EngineError::SettingsError {
            path: path_str,
            message,
        })
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        let settings: Self = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        if settings.load_timeout_ms == 0 {
            return Err("load_timeout_ms must be greater than zero".to_string());
        }
        Ok(settings)
    }

    /// Returns the cache time-to-live.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Returns the load timeout.
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Builds the rate cache these settings describe.
    pub fn build_cache(&self) -> RateTableCache {
        let loader = RateTableLoader::from_dir(&self.rates_dir).with_timeout(self.load_timeout());
        RateTableCache::new(loader, self.cache_ttl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_settings_file() {
        let yaml = r#"
rates_dir: /srv/rates
cache_ttl_secs: 300
load_timeout_ms: 500
profile: legacy
bind_address: 0.0.0.0:9000
"#;
        let settings = EngineSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.rates_dir, PathBuf::from("/srv/rates"));
        assert_eq!(settings.cache_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(settings.load_timeout(), Duration::from_millis(500));
        assert_eq!(settings.profile, CalculationProfile::Legacy);
        assert_eq!(settings.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn test_defaults_apply_to_empty_mapping() {
        let settings = EngineSettings::from_yaml("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.cache_ttl(), None);
        assert_eq!(settings.profile, CalculationProfile::Current);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(EngineSettings::from_yaml("load_timeout_ms: 0").is_err());
    }

    #[test]
    fn test_unknown_profile_rejected() {
        assert!(EngineSettings::from_yaml("profile: experimental").is_err());
    }

    #[test]
    fn test_missing_file_is_settings_error() {
        match EngineSettings::load("/nonexistent/settings.yaml") {
            Err(EngineError::SettingsError { path, .. }) => {
                assert!(path.contains("settings.yaml"));
            }
            other => panic!("Expected SettingsError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file_and_build_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "cache_ttl_secs: 60\n").unwrap();

        let settings = EngineSettings::load(&path).unwrap();
        let cache = settings.build_cache();
        assert_eq!(cache.ttl(), Some(Duration::from_secs(60)));
        assert!(cache.is_empty());
    }
}
