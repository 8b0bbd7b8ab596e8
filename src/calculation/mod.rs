//! Calculation logic for the earned wage access engine.
//!
//! This module contains the statutory deduction schedule and one function
//! per deduction policy, rate resolution with versioned fallbacks, accrual
//! and access cap calculation, the platform fee, and the [`SalaryEngine`]
//! that runs them in order.

mod accrual;
mod deductions;
mod engine;
mod platform_fee;
mod rate_resolution;
mod rounding;
mod schedule;

#[cfg(test)]
mod proptest_engine;

pub use accrual::{AccessCapResult, AccrualResult, calculate_access_cap, calculate_accrual};
pub use deductions::{
    DeductionResult, calculate_capped_percentage, calculate_flat_amount,
    calculate_percentage_of_salary, calculate_progressive_bands,
};
pub use engine::{SalaryEngine, calculate};
pub use platform_fee::{PlatformFeeResult, calculate_platform_fee, resolve_fee_basis};
pub use rate_resolution::{RateOrigin, RateResolver, ResolvedRate};
pub use rounding::{MONEY_DP, checked_product, round_charge, round_entitlement};
pub use schedule::{DeductionPolicy, DeductionRule, STATUTORY_DEDUCTIONS};
