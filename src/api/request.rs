//! Request types for the earned wage access API.
//!
//! This module defines the JSON request body for the `/calculate` endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::CalculationInput;

/// Request body for the `/calculate` endpoint.
///
/// Decimal fields accept JSON numbers or numeric strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Gross salary for the pay cycle.
    pub salary: Decimal,
    /// Length of the pay cycle in days.
    pub cycle_days: Decimal,
    /// Days worked so far in the cycle.
    pub worked_days: Decimal,
    /// Two-letter country code.
    pub country_code: String,
}

impl From<CalculationRequest> for CalculationInput {
    fn from(req: CalculationRequest) -> Self {
        CalculationInput::new(req.salary, req.cycle_days, req.worked_days, req.country_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_accepts_numbers_and_strings() {
        let json = r#"{
            "salary": "30000.50",
            "cycle_days": 30,
            "worked_days": 12.5,
            "country_code": "KE"
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.salary, Decimal::from_str("30000.50").unwrap());
        assert_eq!(request.cycle_days, Decimal::from(30));
        assert_eq!(request.worked_days, Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{ "salary": 30000, "cycle_days": 30, "country_code": "KE" }"#;
        let error = serde_json::from_str::<CalculationRequest>(json).unwrap_err();
        assert!(error.to_string().contains("missing field `worked_days`"));
    }

    #[test]
    fn test_converts_into_input() {
        let request = CalculationRequest {
            salary: Decimal::from(30000),
            cycle_days: Decimal::from(30),
            worked_days: Decimal::from(15),
            country_code: "KE".to_string(),
        };
        let input: CalculationInput = request.into();
        assert_eq!(input.country_code, "KE");
        assert!(input.validate().is_ok());
    }
}
