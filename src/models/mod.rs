//! Core data models for the earned wage access engine.
//!
//! This module contains the input, output and audit models used throughout
//! the engine.

mod calculation_input;
mod calculation_result;
mod deduction;

pub use calculation_input::CalculationInput;
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, BANDS_ABSENT_WARNING, CalculationResult, FeeBasis,
    RATE_FALLBACK_WARNING,
};
pub use deduction::DeductionKind;
