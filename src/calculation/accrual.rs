//! Accrued earnings and access cap calculation.
//!
//! Accrued earnings are the share of the cycle salary attributable to days
//! already worked. The access cap is the configured fraction of that accrual
//! an employee may draw before payday.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::rate_resolution::ResolvedRate;
use super::rounding::round_entitlement;

/// The result of the accrual calculation.
#[derive(Debug, Clone)]
pub struct AccrualResult {
    /// Gross wages earned so far this cycle.
    pub accrued_gross: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of the access cap calculation.
#[derive(Debug, Clone)]
pub struct AccessCapResult {
    /// The fraction that was applied.
    pub fraction: Decimal,
    /// The maximum amount that may be drawn.
    pub access_cap: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates accrued earnings: `salary × worked_days / cycle_days`.
///
/// The result is rounded toward zero to the cent.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if `cycle_days` is not positive.
///
/// # Examples
///
/// ```
/// use ewa_engine::calculation::calculate_accrual;
/// use rust_decimal::Decimal;
///
/// let result = calculate_accrual(
///     Decimal::from(30000),
///     Decimal::from(30),
///     Decimal::from(15),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.accrued_gross, Decimal::from(15000));
/// ```
pub fn calculate_accrual(
    salary: Decimal,
    cycle_days: Decimal,
    worked_days: Decimal,
    step_number: u32,
) -> EngineResult<AccrualResult> {
    if cycle_days <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "cycle_days",
            "must be greater than zero",
        ));
    }
    // Multiply first for exactness; divide first when the product overflows.
    let accrued = salary
        .checked_mul(worked_days)
        .and_then(|earned| earned.checked_div(cycle_days))
        .or_else(|| {
            worked_days
                .checked_div(cycle_days)
                .and_then(|share| salary.checked_mul(share))
        })
        .ok_or_else(|| {
            EngineError::inconsistent(format!(
                "accrued earnings overflow ({} × {}/{})",
                salary, worked_days, cycle_days
            ))
        })?;
    let accrued_gross = round_entitlement(accrued);

    let audit_step = AuditStep {
        step_number,
        rule_id: "accrued_earnings".to_string(),
        rule_name: "Accrued Earnings".to_string(),
        input: serde_json::json!({
            "salary": salary.normalize().to_string(),
            "cycle_days": cycle_days.normalize().to_string(),
            "worked_days": worked_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "accrued_gross": accrued_gross.normalize().to_string()
        }),
        reasoning: format!(
            "{} × {}/{} days = {}",
            salary.normalize(),
            worked_days.normalize(),
            cycle_days.normalize(),
            accrued_gross.normalize()
        ),
    };

    Ok(AccrualResult {
        accrued_gross,
        audit_step,
    })
}

/// Calculates the access cap: `accrued_gross × fraction`.
///
/// # Errors
///
/// Returns [`EngineError::InconsistentConfiguration`] if the fraction lies
/// outside `[0, 1]`; a cap above the accrual would advance unearned wages.
pub fn calculate_access_cap(
    accrued_gross: Decimal,
    fraction: &ResolvedRate,
    step_number: u32,
) -> EngineResult<AccessCapResult> {
    if fraction.value < Decimal::ZERO || fraction.value > Decimal::ONE {
        return Err(EngineError::inconsistent(format!(
            "'{}' must lie within [0, 1], got {}",
            fraction.label, fraction.value
        )));
    }

    let access_cap = round_entitlement(accrued_gross * fraction.value);

    let audit_step = AuditStep {
        step_number,
        rule_id: "access_cap".to_string(),
        rule_name: "Access Cap".to_string(),
        input: serde_json::json!({
            "accrued_gross": accrued_gross.normalize().to_string(),
            "fraction": fraction.to_audit_json()
        }),
        output: serde_json::json!({
            "access_cap": access_cap.normalize().to_string()
        }),
        reasoning: format!(
            "{} × {} = {}",
            accrued_gross.normalize(),
            fraction.value.normalize(),
            access_cap.normalize()
        ),
    };

    Ok(AccessCapResult {
        fraction: fraction.value,
        access_cap,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::RateOrigin;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fraction(value: &str) -> ResolvedRate {
        ResolvedRate {
            label: "Withdrawal Limit",
            value: dec(value),
            origin: RateOrigin::Configured,
        }
    }

    /// AC-001: half a cycle worked
    #[test]
    fn test_half_cycle() {
        let result = calculate_accrual(dec("30000"), dec("30"), dec("15"), 5).unwrap();
        assert_eq!(result.accrued_gross, dec("15000"));
        assert_eq!(result.audit_step.step_number, 5);
        assert_eq!(result.audit_step.output["accrued_gross"], "15000");
    }

    #[test]
    fn test_no_days_worked() {
        let result = calculate_accrual(dec("30000"), dec("30"), dec("0"), 1).unwrap();
        assert_eq!(result.accrued_gross, Decimal::ZERO);
    }

    #[test]
    fn test_full_cycle_equals_salary() {
        let result = calculate_accrual(dec("30000.55"), dec("31"), dec("31"), 1).unwrap();
        assert_eq!(result.accrued_gross, dec("30000.55"));
    }

    #[test]
    fn test_accrual_near_decimal_limit() {
        let salary = dec("10000000000000000000000000000");
        let result = calculate_accrual(salary, dec("30"), dec("15"), 1).unwrap();
        assert_eq!(result.accrued_gross, dec("5000000000000000000000000000"));

        let full = calculate_accrual(salary, dec("30"), dec("30"), 1).unwrap();
        assert_eq!(full.accrued_gross, salary);
    }

    #[test]
    fn test_zero_cycle_rejected() {
        let result = calculate_accrual(dec("30000"), Decimal::ZERO, Decimal::ZERO, 1);
        assert!(matches!(
            result,
            Err(EngineError::InvalidInput { ref field, .. }) if field == "cycle_days"
        ));
    }

    #[test]
    fn test_accrual_rounds_toward_zero() {
        // 30000 × 10 / 31 = 9677.4193...
        let result = calculate_accrual(dec("30000"), dec("31"), dec("10"), 1).unwrap();
        assert_eq!(result.accrued_gross, dec("9677.41"));
    }

    /// AC-002: the sixty percent rule
    #[test]
    fn test_access_cap_sixty_percent() {
        let result = calculate_access_cap(dec("15000"), &fraction("0.6"), 6).unwrap();
        assert_eq!(result.access_cap, dec("9000"));
        assert_eq!(result.fraction, dec("0.6"));
    }

    #[test]
    fn test_access_cap_fraction_above_one_rejected() {
        let result = calculate_access_cap(dec("15000"), &fraction("1.2"), 6);
        match result {
            Err(EngineError::InconsistentConfiguration { message }) => {
                assert!(message.contains("Withdrawal Limit"));
            }
            other => panic!("Expected InconsistentConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_access_cap_zero_fraction() {
        let result = calculate_access_cap(dec("15000"), &fraction("0"), 6).unwrap();
        assert_eq!(result.access_cap, Decimal::ZERO);
    }
}
