//! Monetary rounding.
//!
//! Charges (deductions, fees) round half away from zero to the cent.
//! Amounts made available to the employee (accrual, access cap) round toward
//! zero so an advance never exceeds what was actually earned.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Number of decimal places kept on monetary values.
pub const MONEY_DP: u32 = 2;

/// Rounds a charge to the cent, half away from zero.
pub fn round_charge(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an entitlement to the cent, toward zero.
pub fn round_entitlement(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::ToZero)
}

/// Multiplies two values, reporting overflow instead of panicking.
pub fn checked_product(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| {
        EngineError::inconsistent(format!("{} overflows ({} × {})", what, a, b))
    })
}
