//! Calculation input model.
//!
//! This module defines the per-request facts the engine needs: the salary,
//! the pay cycle length, how much of it has been worked, and the country
//! whose rates apply.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::MONEY_DP;
use crate::error::{EngineError, EngineResult};

/// Per-request input to the salary calculation.
///
/// # Example
///
/// ```
/// use ewa_engine::models::CalculationInput;
/// use rust_decimal::Decimal;
///
/// let input = CalculationInput::new(
///     Decimal::from(30000),
///     Decimal::from(30),
///     Decimal::from(15),
///     "KE",
/// );
/// assert!(input.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Gross periodic salary. Must be positive and in whole cents.
    pub salary: Decimal,
    /// Length of the pay cycle in days. Must be positive.
    pub cycle_days: Decimal,
    /// Days worked so far in the current cycle, between zero and `cycle_days`.
    pub worked_days: Decimal,
    /// Two-letter country code selecting the rate table.
    pub country_code: String,
}

impl CalculationInput {
    /// Creates a new input.
    pub fn new(
        salary: Decimal,
        cycle_days: Decimal,
        worked_days: Decimal,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            salary,
            cycle_days,
            worked_days,
            country_code: country_code.into(),
        }
    }

    /// Checks the calculation preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.salary <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "salary",
                format!("must be greater than zero, got {}", self.salary),
            ));
        }
        if self.salary.normalize().scale() > MONEY_DP {
            return Err(EngineError::invalid_input(
                "salary",
                format!("must be a whole number of cents, got {}", self.salary),
            ));
        }
        if self.cycle_days <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "cycle_days",
                format!("must be greater than zero, got {}", self.cycle_days),
            ));
        }
        if self.worked_days < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "worked_days",
                format!("cannot be negative, got {}", self.worked_days),
            ));
        }
        if self.worked_days > self.cycle_days {
            return Err(EngineError::invalid_input(
                "worked_days",
                format!(
                    "{} exceeds cycle length of {} days",
                    self.worked_days, self.cycle_days
                ),
            ));
        }
        let code = self.country_code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::invalid_input(
                "country_code",
                format!("'{}' is not a two-letter country code", self.country_code),
            ));
        }
        Ok(())
    }
}
