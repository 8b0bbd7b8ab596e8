//! Versioned fallback rate tables.
//!
//! The engine consults these only after the loaded [`RateTable`](super::RateTable)
//! confirms a label is absent. Each table carries a version string that is
//! recorded alongside every fallback so configuration drift can be traced.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::keys;

/// Which calculation behaviour to apply.
///
/// `Current` is authoritative. `Legacy` reproduces the older handler path
/// that used the pre-2024 social security cap and a flat platform fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationProfile {
    /// Configuration-driven path with a percentage platform fee.
    #[default]
    Current,
    /// Older hardcoded path with a flat platform fee.
    Legacy,
}

impl CalculationProfile {
    /// Returns the fallback table for this profile.
    pub fn fallbacks(self) -> &'static FallbackRates {
        match self {
            CalculationProfile::Current => &CURRENT_FALLBACKS,
            CalculationProfile::Legacy => &LEGACY_FALLBACKS,
        }
    }

    /// Returns the profile name as used in settings files and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationProfile::Current => "current",
            CalculationProfile::Legacy => "legacy",
        }
    }
}

/// A versioned set of default constants keyed by rate label.
#[derive(Debug)]
pub struct FallbackRates {
    /// Version identifier recorded on every fallback event.
    pub version: &'static str,
    entries: &'static [(&'static str, Decimal)],
}

impl FallbackRates {
    /// Returns the default for `label`, if this table defines one.
    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, value)| *value)
    }

    /// Returns every label this table defines.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }
}

/// Defaults in force since the February 2024 social security revision.
pub static CURRENT_FALLBACKS: FallbackRates = FallbackRates {
    version: "2024-02",
    entries: &[
        (keys::NSSF_RATE, Decimal::from_parts(6, 0, 0, false, 2)),
        (keys::NSSF_CAP, Decimal::from_parts(2160, 0, 0, false, 0)),
        (keys::SHIF_AMOUNT, Decimal::from_parts(1200, 0, 0, false, 0)),
        (keys::HOUSING_LEVY_RATE, Decimal::from_parts(15, 0, 0, false, 3)),
        (keys::WITHDRAWAL_LIMIT, Decimal::from_parts(6, 0, 0, false, 1)),
        (keys::PLATFORM_FEE_RATE, Decimal::from_parts(5, 0, 0, false, 2)),
    ],
};

/// Defaults of the older calculation path.
pub static LEGACY_FALLBACKS: FallbackRates = FallbackRates {
    version: "2023-01",
    entries: &[
        (keys::NSSF_RATE, Decimal::from_parts(6, 0, 0, false, 2)),
        (keys::NSSF_CAP, Decimal::from_parts(1080, 0, 0, false, 0)),
        (keys::SHIF_AMOUNT, Decimal::from_parts(1200, 0, 0, false, 0)),
        (keys::HOUSING_LEVY_RATE, Decimal::from_parts(15, 0, 0, false, 3)),
        (keys::WITHDRAWAL_LIMIT, Decimal::from_parts(6, 0, 0, false, 1)),
        (keys::PLATFORM_FEE, Decimal::from_parts(100, 0, 0, false, 0)),
    ],
};
