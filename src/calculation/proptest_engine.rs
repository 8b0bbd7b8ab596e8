//! Property-based tests for the calculation pipeline.
//!
//! These check the result relationships, determinism, accrual monotonicity
//! and band coverage over generated salaries and cycles.

use std::collections::HashMap;
use std::str::FromStr;

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::deductions::calculate_progressive_bands;
use super::engine::SalaryEngine;
use crate::config::{Band, CalculationProfile, RateTable};
use crate::models::{CalculationInput, DeductionKind};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn banded_table() -> RateTable {
    RateTable::new(
        HashMap::new(),
        vec![
            Band::new(dec("0"), Some(dec("24000")), dec("0.10")),
            Band::new(dec("24000"), Some(dec("32333")), dec("0.25")),
            Band::new(dec("32333"), Some(dec("500000")), dec("0.30")),
            Band::new(dec("500000"), Some(dec("800000")), dec("0.325")),
            Band::new(dec("800000"), None, dec("0.35")),
        ],
    )
    .unwrap()
}

/// Salaries in cents, high enough that the flat health charge never
/// exceeds them.
fn salary_strategy() -> impl Strategy<Value = Decimal> {
    (500_000i64..200_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// A cycle length and a worked-days value within it, in half days.
fn cycle_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
    (2i64..=62).prop_flat_map(|half_days| {
        (0i64..=half_days).prop_map(move |worked| {
            (Decimal::new(half_days * 5, 1), Decimal::new(worked * 5, 1))
        })
    })
}

fn profile_strategy() -> impl Strategy<Value = CalculationProfile> {
    prop_oneof![
        Just(CalculationProfile::Current),
        Just(CalculationProfile::Legacy)
    ]
}

proptest! {
    /// Property: every valid input yields a result whose relationships hold.
    #[test]
    fn prop_results_satisfy_invariants(
        salary in salary_strategy(),
        (cycle_days, worked_days) in cycle_strategy(),
        profile in profile_strategy(),
        with_bands in any::<bool>(),
    ) {
        let table = if with_bands { banded_table() } else { RateTable::empty() };
        let input = CalculationInput::new(salary, cycle_days, worked_days, "KE");

        let result = SalaryEngine::new(profile).calculate(&input, &table).unwrap();

        prop_assert!(result.total_deductions >= Decimal::ZERO);
        prop_assert!(result.net_pay <= salary);
        prop_assert!(result.accrued_gross >= Decimal::ZERO);
        prop_assert!(result.accrued_gross <= salary);
        prop_assert!(result.access_cap >= Decimal::ZERO);
        prop_assert!(result.access_cap <= result.accrued_gross);
        prop_assert!(result.accessible_now >= Decimal::ZERO);
        prop_assert!(result.accessible_now <= result.access_cap);
    }

    /// Property: identical arguments give identical results.
    #[test]
    fn prop_calculation_is_deterministic(
        salary in salary_strategy(),
        (cycle_days, worked_days) in cycle_strategy(),
    ) {
        let table = banded_table();
        let input = CalculationInput::new(salary, cycle_days, worked_days, "KE");
        let engine = SalaryEngine::default();

        let first = engine.calculate(&input, &table).unwrap();
        let second = engine.calculate(&input, &table).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: working more days never lowers accrual or the access cap.
    #[test]
    fn prop_accrual_is_monotonic_in_worked_days(
        salary in salary_strategy(),
        (cycle_days, worked_days) in cycle_strategy(),
        extra_half_days in 0i64..=62,
    ) {
        let more = (worked_days + Decimal::new(extra_half_days * 5, 1)).min(cycle_days);
        let engine = SalaryEngine::default();
        let table = RateTable::empty();

        let fewer = engine
            .calculate(&CalculationInput::new(salary, cycle_days, worked_days, "KE"), &table)
            .unwrap();
        let later = engine
            .calculate(&CalculationInput::new(salary, cycle_days, more, "KE"), &table)
            .unwrap();

        prop_assert!(later.accrued_gross >= fewer.accrued_gross);
        prop_assert!(later.access_cap >= fewer.access_cap);
    }

    /// Property: the cycle boundaries give zero and the full salary.
    #[test]
    fn prop_cycle_boundaries(
        salary in salary_strategy(),
        (cycle_days, _) in cycle_strategy(),
    ) {
        let engine = SalaryEngine::default();
        let table = RateTable::empty();

        let start = engine
            .calculate(&CalculationInput::new(salary, cycle_days, Decimal::ZERO, "KE"), &table)
            .unwrap();
        prop_assert_eq!(start.accrued_gross, Decimal::ZERO);
        prop_assert_eq!(start.accessible_now, Decimal::ZERO);

        let end = engine
            .calculate(&CalculationInput::new(salary, cycle_days, cycle_days, "KE"), &table)
            .unwrap();
        prop_assert_eq!(end.accrued_gross, salary);
    }

    /// Property: at a band's upper bound the banded deduction equals the
    /// cumulative sum of every band up to and including it.
    #[test]
    fn prop_band_upper_equals_cumulative_sum(index in 0usize..4) {
        let table = banded_table();
        let bands = table.bands();
        let upper = bands[index].upper.unwrap();

        let cumulative: Decimal = bands[..=index]
            .iter()
            .map(|band| (band.upper.unwrap() - band.lower) * band.rate)
            .sum();

        let result = calculate_progressive_bands(DeductionKind::Paye, upper, bands, 1);
        prop_assert_eq!(result.amount, cumulative.round_dp(2));
    }
}
