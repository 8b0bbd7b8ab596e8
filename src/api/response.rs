//! Response types for the earned wage access API.
//!
//! This module defines the success envelopes and the error response
//! structures for the HTTP API.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Band, CalculationProfile, RateTable};
use crate::error::EngineError;
use crate::models::CalculationResult;

/// Success body of `POST /calculate`.
///
/// The identifiers and timestamp live here rather than on the result so the
/// result itself stays reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// The calculation profile applied.
    pub profile: CalculationProfile,
    /// The calculation result.
    pub result: CalculationResult,
}

impl CalculationResponse {
    /// Wraps a result with a fresh id and the current time.
    pub fn new(calculation_id: Uuid, result: CalculationResult) -> Self {
        Self {
            calculation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: result.profile,
            result,
        }
    }
}

/// Success body of `GET /rates/{country}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesResponse {
    /// The normalised country code.
    pub country_code: String,
    /// Named flat rates, sorted by label.
    pub flat_rates: BTreeMap<String, Decimal>,
    /// Progressive bands ordered by lower bound.
    pub bands: Vec<Band>,
    /// Whether the bands cover their range without gaps.
    pub bands_contiguous: bool,
}

impl RatesResponse {
    /// Describes `table` for inspection.
    pub fn new(country_code: String, table: &RateTable) -> Self {
        Self {
            country_code,
            flat_rates: table
                .flat_rates()
                .iter()
                .map(|(label, value)| (label.clone(), *value))
                .collect(),
            bands: table.bands().to_vec(),
            bands_contiguous: table.bands_are_contiguous(),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an unsupported country error response.
    pub fn country_not_supported(country: &str) -> Self {
        Self::with_details(
            "COUNTRY_NOT_SUPPORTED",
            format!("Country not supported: {}", country),
            format!("No rate configuration is deployed for '{}'", country),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidInput { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("Check the '{}' field of the request", field),
                ),
            },
            EngineError::ConfigNotFound { country } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::country_not_supported(&country),
            },
            EngineError::ConfigUnavailable { country, .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_UNAVAILABLE",
                    format!("Rate configuration for '{}' is unavailable", country),
                    message,
                ),
            },
            EngineError::InconsistentConfiguration { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "INCONSISTENT_CONFIGURATION",
                    "Calculation rejected",
                    message,
                ),
            },
            EngineError::SettingsError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_UNAVAILABLE", "Service misconfigured", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidInput {
            field: "salary".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_INPUT");
        assert!(api_error.error.message.contains("salary"));
    }

    #[test]
    fn test_unknown_country_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            country: "ZZ".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "COUNTRY_NOT_SUPPORTED");
    }

    #[test]
    fn test_deployment_failures_are_server_errors() {
        let unavailable: ApiErrorResponse = EngineError::ConfigUnavailable {
            country: "KE".to_string(),
            message: "timed out after 2000 ms".to_string(),
        }
        .into();
        assert_eq!(unavailable.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unavailable.error.code, "CONFIG_UNAVAILABLE");
        assert!(unavailable.error.details.unwrap().contains("timed out"));

        let inconsistent: ApiErrorResponse = EngineError::InconsistentConfiguration {
            message: "deductions exceed salary".to_string(),
        }
        .into();
        assert_eq!(inconsistent.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(inconsistent.error.code, "INCONSISTENT_CONFIGURATION");
    }

    #[test]
    fn test_rates_response_sorts_labels() {
        let mut flat = std::collections::HashMap::new();
        flat.insert("SHIF Amount".to_string(), Decimal::from(1200));
        flat.insert("NSSF Rate".to_string(), Decimal::new(6, 2));
        let table = RateTable::new(flat, vec![]).unwrap();

        let response = RatesResponse::new("KE".to_string(), &table);
        let labels: Vec<&String> = response.flat_rates.keys().collect();
        assert_eq!(labels, vec!["NSSF Rate", "SHIF Amount"]);
        assert!(response.bands.is_empty());
    }
}
