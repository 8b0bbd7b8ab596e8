//! The statutory deduction schedule.
//!
//! Each deduction is bound to one computation policy here, at build time.
//! The rate table only supplies numbers; it never decides which formula a
//! deduction uses.

use crate::config::keys;
use crate::models::DeductionKind;

/// How a deduction is computed from the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductionPolicy {
    /// `min(salary × rate, cap)`.
    CappedPercentage {
        /// Label of the rate.
        rate: &'static str,
        /// Label of the cap.
        cap: &'static str,
    },
    /// A fixed amount read from the table.
    FlatAmount {
        /// Label of the amount.
        amount: &'static str,
    },
    /// `salary × rate`.
    PercentageOfSalary {
        /// Label of the rate.
        rate: &'static str,
    },
    /// Sum of band contributions. Skipped when the table has no bands.
    ProgressiveBands,
}

/// A deduction bound to its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeductionRule {
    /// Which deduction this is.
    pub kind: DeductionKind,
    /// How it is computed.
    pub policy: DeductionPolicy,
}

/// The deductions applied to every calculation, in order.
pub const STATUTORY_DEDUCTIONS: &[DeductionRule] = &[
    DeductionRule {
        kind: DeductionKind::Nssf,
        policy: DeductionPolicy::CappedPercentage {
            rate: keys::NSSF_RATE,
            cap: keys::NSSF_CAP,
        },
    },
    DeductionRule {
        kind: DeductionKind::Shif,
        policy: DeductionPolicy::FlatAmount {
            amount: keys::SHIF_AMOUNT,
        },
    },
    DeductionRule {
        kind: DeductionKind::HousingLevy,
        policy: DeductionPolicy::PercentageOfSalary {
            rate: keys::HOUSING_LEVY_RATE,
        },
    },
    DeductionRule {
        kind: DeductionKind::Paye,
        policy: DeductionPolicy::ProgressiveBands,
    },
];
