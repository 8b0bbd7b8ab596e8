//! The salary and eligibility calculation pipeline.
//!
//! [`SalaryEngine::calculate`] runs, in order: input validation, every
//! statutory deduction, the net pay aggregate, accrual, the access cap and
//! the platform fee. Each stage appends a numbered step to the audit trace.
//! No I/O happens here; the rate table is loaded by the caller.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{CalculationProfile, RateTable, keys};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, BANDS_ABSENT_WARNING, CalculationInput, CalculationResult};

use super::accrual::{calculate_access_cap, calculate_accrual};
use super::deductions::{
    DeductionResult, calculate_capped_percentage, calculate_flat_amount,
    calculate_percentage_of_salary, calculate_progressive_bands,
};
use super::platform_fee::{calculate_platform_fee, resolve_fee_basis};
use super::rate_resolution::RateResolver;
use super::schedule::{DeductionPolicy, DeductionRule, STATUTORY_DEDUCTIONS};

/// Runs calculations under one [`CalculationProfile`].
///
/// The engine holds no mutable state and may be shared freely between
/// threads.
///
/// # Example
///
/// ```
/// use ewa_engine::calculation::SalaryEngine;
/// use ewa_engine::config::{CalculationProfile, RateTable};
/// use ewa_engine::models::CalculationInput;
/// use rust_decimal::Decimal;
///
/// let engine = SalaryEngine::new(CalculationProfile::Current);
/// let input = CalculationInput::new(
///     Decimal::from(30000),
///     Decimal::from(30),
///     Decimal::from(15),
///     "KE",
/// );
///
/// let result = engine.calculate(&input, &RateTable::empty()).unwrap();
/// assert_eq!(result.net_pay, Decimal::from(26550));
/// assert_eq!(result.access_cap, Decimal::from(9000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalaryEngine {
    profile: CalculationProfile,
}

impl SalaryEngine {
    /// Creates an engine for `profile`.
    pub fn new(profile: CalculationProfile) -> Self {
        Self { profile }
    }

    /// Returns the profile this engine applies.
    pub fn profile(&self) -> CalculationProfile {
        self.profile
    }

    /// Calculates deductions, net pay and advance eligibility.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`] if `input` violates a precondition.
    /// - [`EngineError::InconsistentConfiguration`] if a required rate is
    ///   missing from both the table and the fallback table, if deductions
    ///   exceed the salary, or if any result relationship fails to hold.
    pub fn calculate(
        &self,
        input: &CalculationInput,
        rates: &RateTable,
    ) -> EngineResult<CalculationResult> {
        input.validate()?;

        let country = input.country_code.trim().to_ascii_uppercase();
        let salary = input.salary;
        let resolver = RateResolver::new(&country, rates, self.profile.fallbacks());
        let mut trace = AuditTrace::default();

        let mut deductions = BTreeMap::new();
        for rule in STATUTORY_DEDUCTIONS {
            if let Some(result) = apply_rule(rule, salary, rates, &resolver, &mut trace)? {
                deductions.insert(result.kind.key().to_string(), result.amount);
                trace.steps.push(result.audit_step);
            }
        }

        let total_deductions = deductions
            .values()
            .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
            .ok_or_else(|| EngineError::inconsistent("total deductions overflow"))?;
        if total_deductions > salary {
            return Err(EngineError::inconsistent(format!(
                "deductions {} exceed salary {} for {}",
                total_deductions, salary, country
            )));
        }
        let net_pay = salary - total_deductions;
        let applied: BTreeMap<&str, String> = deductions
            .iter()
            .map(|(key, amount)| (key.as_str(), amount.normalize().to_string()))
            .collect();
        trace.push_step(
            "net_pay",
            "Net Pay",
            serde_json::json!({
                "salary": salary.normalize().to_string(),
                "deductions": applied
            }),
            serde_json::json!({
                "total_deductions": total_deductions.normalize().to_string(),
                "net_pay": net_pay.normalize().to_string()
            }),
            format!(
                "{} - {} = {}",
                salary.normalize(),
                total_deductions.normalize(),
                net_pay.normalize()
            ),
        );

        let accrual = calculate_accrual(
            salary,
            input.cycle_days,
            input.worked_days,
            trace.next_step_number(),
        )?;
        trace.steps.push(accrual.audit_step);

        let fraction = resolver.resolve(keys::WITHDRAWAL_LIMIT, &mut trace)?;
        let cap = calculate_access_cap(accrual.accrued_gross, &fraction, trace.next_step_number())?;
        trace.steps.push(cap.audit_step);

        let (basis, _) = resolve_fee_basis(&resolver, &mut trace)?;
        let fee = calculate_platform_fee(cap.access_cap, basis, trace.next_step_number())?;
        trace.steps.push(fee.audit_step);

        let result = CalculationResult {
            country_code: country,
            profile: self.profile,
            salary,
            deductions,
            total_deductions,
            net_pay,
            accrued_gross: accrual.accrued_gross,
            access_cap_fraction: cap.fraction,
            access_cap: cap.access_cap,
            fee_basis: fee.basis,
            platform_fee: fee.platform_fee,
            accessible_now: fee.accessible_now,
            audit_trace: trace,
        };
        result.check_invariants()?;

        debug!(
            country = %result.country_code,
            profile = self.profile.as_str(),
            net_pay = %result.net_pay,
            accessible_now = %result.accessible_now,
            fallbacks = result.audit_trace.fallback_count(),
            "Calculation complete"
        );

        Ok(result)
    }
}

fn apply_rule(
    rule: &DeductionRule,
    salary: Decimal,
    rates: &RateTable,
    resolver: &RateResolver<'_>,
    trace: &mut AuditTrace,
) -> EngineResult<Option<DeductionResult>> {
    let step_number = trace.next_step_number();
    let result = match rule.policy {
        DeductionPolicy::CappedPercentage { rate, cap } => {
            let rate = resolver.resolve(rate, trace)?;
            let cap = resolver.resolve(cap, trace)?;
            calculate_capped_percentage(rule.kind, salary, &rate, &cap, step_number)?
        }
        DeductionPolicy::FlatAmount { amount } => {
            let amount = resolver.resolve(amount, trace)?;
            calculate_flat_amount(rule.kind, &amount, step_number)
        }
        DeductionPolicy::PercentageOfSalary { rate } => {
            let rate = resolver.resolve(rate, trace)?;
            calculate_percentage_of_salary(rule.kind, salary, &rate, step_number)?
        }
        DeductionPolicy::ProgressiveBands if rates.bands().is_empty() => {
            trace.warn(
                BANDS_ABSENT_WARNING,
                format!(
                    "No bands configured; {} not applied",
                    rule.kind.display_name()
                ),
                "low",
            );
            return Ok(None);
        }
        DeductionPolicy::ProgressiveBands => {
            calculate_progressive_bands(rule.kind, salary, rates.bands(), step_number)
        }
    };
    Ok(Some(result))
}

/// Calculates with the default [`CalculationProfile`].
///
/// # Errors
///
/// See [`SalaryEngine::calculate`].
pub fn calculate(input: &CalculationInput, rates: &RateTable) -> EngineResult<CalculationResult> {
    SalaryEngine::default().calculate(input, rates)
}
