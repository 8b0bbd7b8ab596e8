//! Rate lookup with versioned fallbacks.
//!
//! A [`RateResolver`] reads a label from the loaded [`RateTable`] and, only
//! when the table lacks it, from the profile's [`FallbackRates`]. Every
//! fallback is logged and recorded as an audit warning.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::config::{FallbackRates, RateTable, keys};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, RATE_FALLBACK_WARNING};

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RateOrigin {
    /// Read from the country rate table.
    Configured,
    /// Taken from a fallback table.
    Fallback {
        /// Version of the fallback table.
        version: &'static str,
    },
}

/// A rate value together with its label and origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    /// The label that was looked up.
    pub label: &'static str,
    /// The value.
    pub value: Decimal,
    /// Where the value came from.
    pub origin: RateOrigin,
}

impl ResolvedRate {
    /// Returns a JSON description for audit steps.
    pub fn to_audit_json(&self) -> serde_json::Value {
        serde_json::json!({
            "label": self.label,
            "value": self.value.normalize().to_string(),
            "origin": self.origin,
        })
    }

    /// Checks the value against the range its label allows.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InconsistentConfiguration`] if a fraction label
    /// holds a value outside `[0, 1]`.
    pub fn validated(self) -> EngineResult<Self> {
        if keys::FRACTION_LABELS.contains(&self.label)
            && (self.value < Decimal::ZERO || self.value > Decimal::ONE)
        {
            return Err(EngineError::inconsistent(format!(
                "'{}' must lie within [0, 1], got {}",
                self.label,
                self.value.normalize()
            )));
        }
        Ok(self)
    }
}

/// Resolves rate labels against a table and a fallback table.
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    country: &'a str,
    table: &'a RateTable,
    fallbacks: &'static FallbackRates,
}

impl<'a> RateResolver<'a> {
    /// Creates a resolver.
    pub fn new(country: &'a str, table: &'a RateTable, fallbacks: &'static FallbackRates) -> Self {
        Self {
            country,
            table,
            fallbacks,
        }
    }

    /// Returns the table value for `label` without consulting fallbacks.
    pub fn configured(&self, label: &'static str) -> Option<ResolvedRate> {
        self.table.flat_rate(label).map(|value| ResolvedRate {
            label,
            value,
            origin: RateOrigin::Configured,
        })
    }

    /// Returns the fallback value for `label`, recording the fallback.
    pub fn fallback(&self, label: &'static str, trace: &mut AuditTrace) -> Option<ResolvedRate> {
        let value = self.fallbacks.get(label)?;

        warn!(
            country = %self.country,
            label = label,
            fallback_version = self.fallbacks.version,
            value = %value,
            "Rate missing from table, using fallback"
        );
        trace.warn(
            RATE_FALLBACK_WARNING,
            format!(
                "'{}' not configured for {}; used fallback {} from table {}",
                label,
                self.country,
                value.normalize(),
                self.fallbacks.version
            ),
            "medium",
        );

        Some(ResolvedRate {
            label,
            value,
            origin: RateOrigin::Fallback {
                version: self.fallbacks.version,
            },
        })
    }

    /// Resolves `label`, falling back when the table lacks it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InconsistentConfiguration`] if neither the
    /// table nor the fallback table defines the label, or if the value is
    /// out of range for it.
    pub fn resolve(&self, label: &'static str, trace: &mut AuditTrace) -> EngineResult<ResolvedRate> {
        if let Some(rate) = self.configured(label) {
            return rate.validated();
        }
        self.fallback(label, trace)
            .ok_or_else(|| {
                EngineError::inconsistent(format!(
                    "'{}' is not configured for {} and fallback table {} has no default",
                    label, self.country, self.fallbacks.version
                ))
            })?
            .validated()
    }
}
