//! Platform fee calculation.
//!
//! The fee is either a percentage of the access cap or a flat amount. A
//! configured percentage beats a configured flat fee, and anything configured
//! beats the fallback table.

use rust_decimal::Decimal;

use crate::config::keys;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditTrace, FeeBasis};

use super::rate_resolution::{RateResolver, ResolvedRate};
use super::rounding::{checked_product, round_charge};

/// The result of the platform fee calculation.
#[derive(Debug, Clone)]
pub struct PlatformFeeResult {
    /// How the fee was charged.
    pub basis: FeeBasis,
    /// The fee amount.
    pub platform_fee: Decimal,
    /// The access cap less the fee, floored at zero.
    pub accessible_now: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Picks the fee rate or amount to charge.
///
/// Order: configured percentage, configured flat fee, fallback percentage,
/// fallback flat fee. Fallbacks are recorded on `trace`.
///
/// # Errors
///
/// Returns [`EngineError::InconsistentConfiguration`] if no fee is defined
/// anywhere or a fee rate lies outside `[0, 1]`.
pub fn resolve_fee_basis(
    resolver: &RateResolver<'_>,
    trace: &mut AuditTrace,
) -> EngineResult<(FeeBasis, ResolvedRate)> {
    let rate = if let Some(rate) = resolver.configured(keys::PLATFORM_FEE_RATE) {
        rate
    } else if let Some(flat) = resolver.configured(keys::PLATFORM_FEE) {
        flat
    } else if let Some(rate) = resolver.fallback(keys::PLATFORM_FEE_RATE, trace) {
        rate
    } else if let Some(flat) = resolver.fallback(keys::PLATFORM_FEE, trace) {
        flat
    } else {
        return Err(EngineError::inconsistent(
            "no platform fee is configured and the fallback table defines none",
        ));
    };
    let rate = rate.validated()?;

    let basis = if rate.label == keys::PLATFORM_FEE_RATE {
        FeeBasis::Percentage { rate: rate.value }
    } else {
        FeeBasis::Flat { amount: rate.value }
    };
    Ok((basis, rate))
}

/// Calculates the platform fee and the amount accessible now.
///
/// # Examples
///
/// ```
/// use ewa_engine::calculation::calculate_platform_fee;
/// use ewa_engine::models::FeeBasis;
/// use rust_decimal::Decimal;
///
/// let result = calculate_platform_fee(
///     Decimal::from(9000),
///     FeeBasis::Flat { amount: Decimal::from(100) },
///     7,
/// )
/// .unwrap();
/// assert_eq!(result.accessible_now, Decimal::from(8900));
/// ```
pub fn calculate_platform_fee(
    access_cap: Decimal,
    basis: FeeBasis,
    step_number: u32,
) -> EngineResult<PlatformFeeResult> {
    let platform_fee = match basis {
        FeeBasis::Percentage { rate } => {
            round_charge(checked_product(access_cap, rate, "platform fee")?)
        }
        FeeBasis::Flat { amount } => round_charge(amount),
    };
    let accessible_now = (access_cap - platform_fee).max(Decimal::ZERO);

    let reasoning = match basis {
        FeeBasis::Percentage { rate } => format!(
            "{} × {} = fee {}; accessible {}",
            access_cap.normalize(),
            rate.normalize(),
            platform_fee.normalize(),
            accessible_now.normalize()
        ),
        FeeBasis::Flat { .. } => format!(
            "Flat fee {} against cap {}; accessible {}",
            platform_fee.normalize(),
            access_cap.normalize(),
            accessible_now.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "platform_fee".to_string(),
        rule_name: "Platform Fee".to_string(),
        input: serde_json::json!({
            "access_cap": access_cap.normalize().to_string(),
            "basis": basis
        }),
        output: serde_json::json!({
            "platform_fee": platform_fee.normalize().to_string(),
            "accessible_now": accessible_now.normalize().to_string()
        }),
        reasoning,
    };

    Ok(PlatformFeeResult {
        basis,
        platform_fee,
        accessible_now,
        audit_step,
    })
}
