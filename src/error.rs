//! Error types for the earned wage access engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the rate loader and the calculation engine can surface.

use thiserror::Error;

/// The main error type for the engine.
///
/// Loader failures (`ConfigNotFound`, `ConfigUnavailable`) and calculation
/// failures (`InvalidInput`, `InconsistentConfiguration`) share one type so
/// callers can propagate either with `?`.
///
/// # Example
///
/// ```
/// use ewa_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     country: "ZZ".to_string(),
/// };
/// assert_eq!(error.to_string(), "No rate configuration for country: ZZ");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No configuration is registered for the requested country.
    #[error("No rate configuration for country: {country}")]
    ConfigNotFound {
        /// The country code that was requested.
        country: String,
    },

    /// A configuration source exists but could not be read or parsed.
    #[error("Rate configuration for '{country}' is unavailable: {message}")]
    ConfigUnavailable {
        /// The country code whose configuration failed to load.
        country: String,
        /// A description of the failure.
        message: String,
    },

    /// Caller-supplied values violate the calculation preconditions.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending input field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The service settings file could not be read or parsed.
    #[error("Failed to load settings '{path}': {message}")]
    SettingsError {
        /// The settings file path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The rate table produced figures that cannot be correct.
    #[error("Inconsistent configuration: {message}")]
    InconsistentConfiguration {
        /// A description of the inconsistency.
        message: String,
    },
}

impl EngineError {
    /// Returns true for failures caused by the caller rather than the deployment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. } | EngineError::ConfigNotFound { .. }
        )
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn inconsistent(message: impl Into<String>) -> Self {
        EngineError::InconsistentConfiguration {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
