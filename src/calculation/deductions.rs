//! Statutory deduction calculations.
//!
//! One function per policy in [`DeductionPolicy`](super::DeductionPolicy).
//! Each takes already resolved rates and returns the rounded amount with an
//! audit step describing how it was reached.

use rust_decimal::Decimal;

use crate::config::Band;
use crate::error::EngineResult;
use crate::models::{AuditStep, DeductionKind};

use super::rate_resolution::ResolvedRate;
use super::rounding::{checked_product, round_charge};

/// The result of computing one deduction.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// Which deduction this is.
    pub kind: DeductionKind,
    /// The rounded amount.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn deduction_step(
    kind: DeductionKind,
    rule_id: &str,
    step_number: u32,
    input: serde_json::Value,
    amount: Decimal,
    reasoning: String,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: format!("{}_{}", kind.key(), rule_id),
        rule_name: kind.display_name().to_string(),
        input,
        output: serde_json::json!({
            "deduction": kind.key(),
            "amount": amount.normalize().to_string()
        }),
        reasoning,
    }
}

/// Calculates a capped-percentage deduction: `min(salary × rate, cap)`.
///
/// # Examples
///
/// ```
/// use ewa_engine::calculation::{RateOrigin, ResolvedRate, calculate_capped_percentage};
/// use ewa_engine::models::DeductionKind;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = ResolvedRate {
///     label: "NSSF Rate",
///     value: Decimal::from_str("0.06").unwrap(),
///     origin: RateOrigin::Configured,
/// };
/// let cap = ResolvedRate {
///     label: "NSSF Cap",
///     value: Decimal::from(2160),
///     origin: RateOrigin::Configured,
/// };
///
/// let result = calculate_capped_percentage(
///     DeductionKind::Nssf,
///     Decimal::from(50000),
///     &rate,
///     &cap,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.amount, Decimal::from(2160));
/// ```
pub fn calculate_capped_percentage(
    kind: DeductionKind,
    salary: Decimal,
    rate: &ResolvedRate,
    cap: &ResolvedRate,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    let uncapped = checked_product(salary, rate.value, kind.display_name())?;
    let cap_applied = uncapped > cap.value;
    let amount = round_charge(uncapped.min(cap.value));

    let reasoning = if cap_applied {
        format!(
            "{} × {} = {} (capped at {})",
            salary.normalize(),
            rate.value.normalize(),
            uncapped.normalize(),
            cap.value.normalize()
        )
    } else {
        format!(
            "{} × {} = {}",
            salary.normalize(),
            rate.value.normalize(),
            amount.normalize()
        )
    };

    let audit_step = deduction_step(
        kind,
        "capped_percentage",
        step_number,
        serde_json::json!({
            "salary": salary.normalize().to_string(),
            "rate": rate.to_audit_json(),
            "cap": cap.to_audit_json(),
            "uncapped_amount": uncapped.normalize().to_string(),
            "cap_applied": cap_applied
        }),
        amount,
        reasoning,
    );

    Ok(DeductionResult {
        kind,
        amount,
        audit_step,
    })
}

/// Calculates a flat-amount deduction.
pub fn calculate_flat_amount(
    kind: DeductionKind,
    amount: &ResolvedRate,
    step_number: u32,
) -> DeductionResult {
    let value = round_charge(amount.value);

    let audit_step = deduction_step(
        kind,
        "flat_amount",
        step_number,
        serde_json::json!({ "amount": amount.to_audit_json() }),
        value,
        format!("Flat charge of {}", value.normalize()),
    );

    DeductionResult {
        kind,
        amount: value,
        audit_step,
    }
}

/// Calculates a percentage-of-salary deduction: `salary × rate`.
pub fn calculate_percentage_of_salary(
    kind: DeductionKind,
    salary: Decimal,
    rate: &ResolvedRate,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    let amount = round_charge(checked_product(salary, rate.value, kind.display_name())?);

    let audit_step = deduction_step(
        kind,
        "percentage_of_salary",
        step_number,
        serde_json::json!({
            "salary": salary.normalize().to_string(),
            "rate": rate.to_audit_json()
        }),
        amount,
        format!(
            "{} × {} = {}",
            salary.normalize(),
            rate.value.normalize(),
            amount.normalize()
        ),
    );

    Ok(DeductionResult {
        kind,
        amount,
        audit_step,
    })
}

/// Calculates a progressive-band deduction.
///
/// Each band contributes `(min(salary, upper) - lower) × rate`; bands that
/// start at or above the salary contribute nothing. Gaps between bands are
/// charged nothing.
///
/// # Examples
///
/// ```
/// use ewa_engine::calculation::calculate_progressive_bands;
/// use ewa_engine::config::Band;
/// use ewa_engine::models::DeductionKind;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let bands = vec![
///     Band::new(Decimal::ZERO, Some(Decimal::from(24000)), Decimal::from_str("0.1").unwrap()),
///     Band::new(Decimal::from(24000), None, Decimal::from_str("0.25").unwrap()),
/// ];
///
/// let result = calculate_progressive_bands(DeductionKind::Paye, Decimal::from(30000), &bands, 1);
/// assert_eq!(result.amount, Decimal::from(3900));
/// ```
pub fn calculate_progressive_bands(
    kind: DeductionKind,
    salary: Decimal,
    bands: &[Band],
    step_number: u32,
) -> DeductionResult {
    let contributions: Vec<Decimal> = bands.iter().map(|band| band.contribution(salary)).collect();
    let total: Decimal = contributions.iter().copied().sum();
    let amount = round_charge(total);

    let band_json: Vec<serde_json::Value> = bands
        .iter()
        .zip(&contributions)
        .map(|(band, contribution)| {
            serde_json::json!({
                "lower": band.lower.normalize().to_string(),
                "upper": band.upper.map(|upper| upper.normalize().to_string()),
                "rate": band.rate.normalize().to_string(),
                "contribution": contribution.normalize().to_string()
            })
        })
        .collect();
    let applied = contributions.iter().filter(|c| !c.is_zero()).count();

    let audit_step = deduction_step(
        kind,
        "progressive_bands",
        step_number,
        serde_json::json!({
            "salary": salary.normalize().to_string(),
            "bands": band_json
        }),
        amount,
        format!(
            "{} of {} bands apply to {}: total {}",
            applied,
            bands.len(),
            salary.normalize(),
            amount.normalize()
        ),
    );

    DeductionResult {
        kind,
        amount,
        audit_step,
    }
}
