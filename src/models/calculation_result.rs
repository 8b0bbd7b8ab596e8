//! Calculation result models.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures: the per-deduction breakdown, the fee basis, and the audit
//! trace recording every rule applied and every fallback taken.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CalculationProfile;
use crate::error::{EngineError, EngineResult};

/// Warning code recorded when a rate came from a fallback table.
pub const RATE_FALLBACK_WARNING: &str = "RATE_FALLBACK";

/// Warning code recorded when a banded deduction had no bands to apply.
pub const BANDS_ABSENT_WARNING: &str = "BANDS_ABSENT";

/// How the platform fee was charged.
///
/// # Example
///
/// ```
/// use ewa_engine::models::FeeBasis;
/// use rust_decimal::Decimal;
///
/// let basis = FeeBasis::Percentage { rate: Decimal::new(5, 2) };
/// let json = serde_json::to_value(&basis).unwrap();
/// assert_eq!(json["type"], "percentage");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeBasis {
    /// A fraction of the access cap.
    Percentage {
        /// The fee rate.
        rate: Decimal,
    },
    /// A fixed amount.
    Flat {
        /// The fee amount.
        amount: Decimal,
    },
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate degraded configuration that did not prevent the
/// calculation but should be looked at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the number the next pushed step will get.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a step, numbering it in sequence.
    pub fn push_step(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.next_step_number();
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: String, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: severity.to_string(),
        });
    }

    /// Returns how many rates came from a fallback table.
    pub fn fallback_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.code == RATE_FALLBACK_WARNING)
            .count()
    }
}

/// The complete result of a salary and eligibility calculation.
///
/// All monetary values are in the currency of the input salary and rounded
/// to two decimal places. The struct carries no timestamps or identifiers,
/// so identical inputs always produce identical results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The country whose rates were applied.
    pub country_code: String,
    /// The calculation profile that was applied.
    pub profile: CalculationProfile,
    /// The gross salary the calculation was run for.
    pub salary: Decimal,
    /// One entry per statutory deduction applied, keyed by deduction key.
    pub deductions: BTreeMap<String, Decimal>,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Salary less total deductions.
    pub net_pay: Decimal,
    /// Gross wages earned so far this cycle.
    pub accrued_gross: Decimal,
    /// Fraction of accrued wages that may be drawn early.
    pub access_cap_fraction: Decimal,
    /// Accrued wages times the access cap fraction.
    pub access_cap: Decimal,
    /// How the platform fee was charged.
    pub fee_basis: FeeBasis,
    /// Fee charged against the accessed amount.
    pub platform_fee: Decimal,
    /// Amount the employee can draw now, never below zero.
    pub accessible_now: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl CalculationResult {
    /// Verifies the relationships every valid result must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InconsistentConfiguration`] describing the
    /// first relationship that does not hold.
    pub fn check_invariants(&self) -> EngineResult<()> {
        let monetary = [
            ("total_deductions", self.total_deductions),
            ("net_pay", self.net_pay),
            ("accrued_gross", self.accrued_gross),
            ("access_cap_fraction", self.access_cap_fraction),
            ("access_cap", self.access_cap),
            ("platform_fee", self.platform_fee),
            ("accessible_now", self.accessible_now),
        ];
        for (name, value) in monetary {
            if value < Decimal::ZERO {
                return Err(EngineError::inconsistent(format!(
                    "{} is negative ({})",
                    name, value
                )));
            }
        }
        for (key, value) in &self.deductions {
            if *value < Decimal::ZERO {
                return Err(EngineError::inconsistent(format!(
                    "deduction '{}' is negative ({})",
                    key, value
                )));
            }
        }

        let sum: Decimal = self.deductions.values().copied().sum();
        if sum != self.total_deductions {
            return Err(EngineError::inconsistent(format!(
                "total_deductions {} does not equal the sum of deductions {}",
                self.total_deductions, sum
            )));
        }
        if self.net_pay > self.salary {
            return Err(EngineError::inconsistent(format!(
                "net_pay {} exceeds salary {}",
                self.net_pay, self.salary
            )));
        }
        if self.accrued_gross > self.salary {
            return Err(EngineError::inconsistent(format!(
                "accrued_gross {} exceeds salary {}",
                self.accrued_gross, self.salary
            )));
        }
        if self.access_cap > self.accrued_gross {
            return Err(EngineError::inconsistent(format!(
                "access_cap {} exceeds accrued_gross {}",
                self.access_cap, self.accrued_gross
            )));
        }
        if self.accessible_now > self.access_cap {
            return Err(EngineError::inconsistent(format!(
                "accessible_now {} exceeds access_cap {}",
                self.accessible_now, self.access_cap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_result() -> CalculationResult {
        let mut deductions = BTreeMap::new();
        deductions.insert("nssf".to_string(), dec("1800"));
        deductions.insert("shif".to_string(), dec("1200"));
        deductions.insert("housing_levy".to_string(), dec("450"));

        CalculationResult {
            country_code: "KE".to_string(),
            profile: CalculationProfile::Current,
            salary: dec("30000"),
            deductions,
            total_deductions: dec("3450"),
            net_pay: dec("26550"),
            accrued_gross: dec("15000"),
            access_cap_fraction: dec("0.6"),
            access_cap: dec("9000"),
            fee_basis: FeeBasis::Percentage { rate: dec("0.05") },
            platform_fee: dec("450"),
            accessible_now: dec("8550"),
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_consistent_result_passes() {
        assert!(sample_result().check_invariants().is_ok());
    }

    #[test]
    fn test_total_must_equal_sum() {
        let mut result = sample_result();
        result.total_deductions = dec("3000");
        let err = result.check_invariants().unwrap_err();
        assert!(err.to_string().contains("sum of deductions"));
    }

    #[test]
    fn test_access_cap_above_accrual_fails() {
        let mut result = sample_result();
        result.access_cap = dec("15000.01");
        assert!(result.check_invariants().is_err());
    }

    #[test]
    fn test_negative_value_fails() {
        let mut result = sample_result();
        result.platform_fee = dec("-1");
        let err = result.check_invariants().unwrap_err();
        assert!(err.to_string().contains("platform_fee"));
    }

    #[test]
    fn test_accessible_above_cap_fails() {
        let mut result = sample_result();
        result.accessible_now = dec("9000.01");
        assert!(result.check_invariants().is_err());
    }

    #[test]
    fn test_audit_trace_numbers_steps_and_counts_fallbacks() {
        let mut trace = AuditTrace::default();
        trace.push_step(
            "accrual",
            "Accrued Earnings",
            serde_json::json!({}),
            serde_json::json!({}),
            "x".to_string(),
        );
        trace.push_step(
            "access_cap",
            "Access Cap",
            serde_json::json!({}),
            serde_json::json!({}),
            "y".to_string(),
        );
        trace.warn(RATE_FALLBACK_WARNING, "NSSF Cap".to_string(), "medium");
        trace.warn(BANDS_ABSENT_WARNING, "no bands".to_string(), "low");

        assert_eq!(trace.steps[0].step_number, 1);
        assert_eq!(trace.steps[1].step_number, 2);
        assert_eq!(trace.fallback_count(), 1);
    }

    #[test]
    fn test_result_serialization_round_trip_keeps_decimals_as_strings() {
        let result = sample_result();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["net_pay"], "26550");
        assert_eq!(json["deductions"]["housing_levy"], "450");
        assert_eq!(json["fee_basis"]["type"], "percentage");
        assert_eq!(json["profile"], "current");

        let back: CalculationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
