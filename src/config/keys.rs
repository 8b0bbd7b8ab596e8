//! Rate table labels the engine looks up.
//!
//! These are the trimmed label cells from the `"Rates"` sheet.

/// Social security contribution rate (fraction of salary).
pub const NSSF_RATE: &str = "NSSF Rate";

/// Social security contribution cap (currency amount).
pub const NSSF_CAP: &str = "NSSF Cap";

/// Flat health insurance charge (currency amount).
pub const SHIF_AMOUNT: &str = "SHIF Amount";

/// Housing levy rate (fraction of salary).
pub const HOUSING_LEVY_RATE: &str = "Housing Levy Rate";

/// Fraction of accrued earnings an employee may draw early.
pub const WITHDRAWAL_LIMIT: &str = "Withdrawal Limit";

/// Platform fee as a fraction of the access cap.
pub const PLATFORM_FEE_RATE: &str = "Platform Fee Rate";

/// Platform fee as a flat currency amount.
pub const PLATFORM_FEE: &str = "Platform Fee";

/// Labels whose values are fractions and must lie within `[0, 1]`.
pub const FRACTION_LABELS: &[&str] = &[
    NSSF_RATE,
    HOUSING_LEVY_RATE,
    WITHDRAWAL_LIMIT,
    PLATFORM_FEE_RATE,
];
