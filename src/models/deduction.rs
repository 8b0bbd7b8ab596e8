//! Statutory deduction kinds.

use serde::{Deserialize, Serialize};

/// A statutory deduction the engine knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// Social security contribution.
    Nssf,
    /// Health insurance charge.
    Shif,
    /// Housing levy.
    HousingLevy,
    /// Income tax computed over progressive bands.
    Paye,
}

impl DeductionKind {
    /// Returns the key used for this deduction in result maps.
    pub fn key(self) -> &'static str {
        match self {
            DeductionKind::Nssf => "nssf",
            DeductionKind::Shif => "shif",
            DeductionKind::HousingLevy => "housing_levy",
            DeductionKind::Paye => "paye",
        }
    }

    /// Returns a human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            DeductionKind::Nssf => "Social Security Contribution",
            DeductionKind::Shif => "Health Insurance",
            DeductionKind::HousingLevy => "Housing Levy",
            DeductionKind::Paye => "Income Tax",
        }
    }
}
