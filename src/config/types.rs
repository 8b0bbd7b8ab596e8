//! Rate table types.
//!
//! This module contains the clean, validated configuration model the
//! calculation engine consumes. Nothing here knows about spreadsheet
//! column names; see the `sheet` module for that adapter.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A progressive rate band.
///
/// Salary between `lower` and `upper` is charged at `rate`. An `upper` of
/// `None` means the band is unbounded above.
///
/// # Example
///
/// ```
/// use ewa_engine::config::Band;
/// use rust_decimal::Decimal;
///
/// let band = Band::new(Decimal::ZERO, Some(Decimal::from(24000)), Decimal::new(1, 1));
/// assert_eq!(band.contribution(Decimal::from(30000)), Decimal::from(2400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive lower bound of the band.
    pub lower: Decimal,
    /// Upper bound of the band, or `None` for unbounded.
    pub upper: Option<Decimal>,
    /// Marginal rate applied within the band, as a fraction.
    pub rate: Decimal,
}

impl Band {
    /// Creates a new band.
    pub fn new(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Self {
        Self { lower, upper, rate }
    }

    /// Returns the amount this band contributes for the given salary.
    ///
    /// A band whose lower bound is at or above the salary contributes zero,
    /// and a contribution is never negative.
    pub fn contribution(&self, salary: Decimal) -> Decimal {
        if self.lower >= salary {
            return Decimal::ZERO;
        }
        let top = match self.upper {
            Some(upper) => upper.min(salary),
            None => salary,
        };
        let width = (top - self.lower).max(Decimal::ZERO);
        width * self.rate
    }
}

/// The resolved, country-specific rate configuration.
///
/// A `RateTable` is immutable once built. Construction through
/// [`RateTable::new`] checks the structural invariants: bands are sorted by
/// lower bound, do not overlap, only the last band is unbounded, band rates
/// lie in `[0, 1]`, and flat values are non-negative. Deserialization runs
/// the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateTable")]
pub struct RateTable {
    /// Named scalar rates, caps, and amounts keyed by trimmed label.
    flat_rates: HashMap<String, Decimal>,
    /// Progressive bands ordered by lower bound.
    bands: Vec<Band>,
}

/// Unchecked wire shape of a [`RateTable`].
#[derive(Deserialize)]
struct RawRateTable {
    flat_rates: HashMap<String, Decimal>,
    bands: Vec<Band>,
}

impl TryFrom<RawRateTable> for RateTable {
    type Error = EngineError;

    fn try_from(raw: RawRateTable) -> EngineResult<Self> {
        RateTable::new(raw.flat_rates, raw.bands)
    }
}

impl RateTable {
    /// Creates a validated rate table.
    ///
    /// Bands are sorted by lower bound before validation, so callers may pass
    /// them in sheet order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InconsistentConfiguration`] if any structural
    /// invariant is violated.
    pub fn new(flat_rates: HashMap<String, Decimal>, bands: Vec<Band>) -> EngineResult<Self> {
        let mut bands = bands;
        bands.sort_by(|a, b| a.lower.cmp(&b.lower));

        for (label, value) in &flat_rates {
            if *value < Decimal::ZERO {
                return Err(EngineError::inconsistent(format!(
                    "flat rate '{}' is negative ({})",
                    label, value
                )));
            }
        }

        let last = bands.len().saturating_sub(1);
        for (index, band) in bands.iter().enumerate() {
            if band.lower < Decimal::ZERO {
                return Err(EngineError::inconsistent(format!(
                    "band {} has a negative lower bound ({})",
                    index, band.lower
                )));
            }
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(EngineError::inconsistent(format!(
                    "band {} rate {} is outside [0, 1]",
                    index, band.rate
                )));
            }
            match band.upper {
                Some(upper) if upper <= band.lower => {
                    return Err(EngineError::inconsistent(format!(
                        "band {} upper bound {} is not above lower bound {}",
                        index, upper, band.lower
                    )));
                }
                None if index != last => {
                    return Err(EngineError::inconsistent(format!(
                        "band {} is unbounded but is not the last band",
                        index
                    )));
                }
                _ => {}
            }
            if index > 0 {
                let previous = &bands[index - 1];
                // Unbounded previous bands were rejected above.
                if let Some(previous_upper) = previous.upper {
                    if band.lower < previous_upper {
                        return Err(EngineError::inconsistent(format!(
                            "band {} starting at {} overlaps band ending at {}",
                            index, band.lower, previous_upper
                        )));
                    }
                }
            }
        }

        Ok(Self { flat_rates, bands })
    }

    /// Creates an empty table. Every lookup against it falls back to defaults.
    pub fn empty() -> Self {
        Self {
            flat_rates: HashMap::new(),
            bands: Vec::new(),
        }
    }

    /// Looks up a flat rate by label. Surrounding whitespace in `label` is ignored.
    pub fn flat_rate(&self, label: &str) -> Option<Decimal> {
        self.flat_rates.get(label.trim()).copied()
    }

    /// Returns all flat rates.
    pub fn flat_rates(&self) -> &HashMap<String, Decimal> {
        &self.flat_rates
    }

    /// Returns the progressive bands, ordered by lower bound.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Returns true if the bands cover `[0, ∞)` without gaps.
    pub fn bands_are_contiguous(&self) -> bool {
        let Some(first) = self.bands.first() else {
            return false;
        };
        if !first.lower.is_zero() {
            return false;
        }
        let joined = self
            .bands
            .windows(2)
            .all(|pair| pair[0].upper == Some(pair[1].lower));
        joined && self.bands.last().is_some_and(|band| band.upper.is_none())
    }
}
