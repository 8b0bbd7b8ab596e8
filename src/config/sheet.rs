//! Spreadsheet export adapter.
//!
//! Country rate files are JSON documents exported from a workbook: an object
//! keyed by sheet name, where the `"Rates"` sheet is an ordered list of row
//! objects keyed by column header. Exports are irregular (stray spaces in
//! headers, numbers stored as text, blank rows), so this module is the only
//! place that knows about that shape. It produces plain flat rates and bands
//! and reports every row it had to skip.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::Band;

/// Name of the sheet holding rates and bands.
pub const RATES_SHEET: &str = "Rates";

/// Header of the label column (also the lower bound column for band rows).
pub const LABEL_COLUMN: &str = "Parameter";

/// Header of the value column for flat-rate rows.
pub const VALUE_COLUMN: &str = "Value";

/// Header of the marginal rate column for band rows.
pub const RATE_COLUMN: &str = "Rate";

/// Header of the upper bound column for band rows.
pub const UPPER_COLUMN: &str = "Upper Limit";

/// Label prefixes reserved for the band table's own header rows.
pub const BAND_HEADER_PREFIXES: &[&str] = &["band", "tier", "bracket"];

/// A row the adapter could not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Zero-based position of the row in the `"Rates"` sheet.
    pub index: usize,
    /// Why the row was skipped.
    pub reason: String,
}

/// The raw contents extracted from a `"Rates"` sheet.
#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    /// Flat rates keyed by trimmed label.
    pub flat_rates: HashMap<String, Decimal>,
    /// Band rows in sheet order.
    pub bands: Vec<Band>,
    /// Rows that were skipped.
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(Decimal),
    Text(String),
    Invalid,
}

/// Extracts flat rates and bands from a country rate document.
///
/// Malformed rows are skipped and listed in [`ParsedSheet::skipped`]; only a
/// missing or non-list `"Rates"` sheet fails the whole document.
///
/// # Errors
///
/// Returns [`EngineError::ConfigUnavailable`] if the document has no usable
/// `"Rates"` sheet.
///
/// # Example
///
/// ```
/// use ewa_engine::config::parse_rates_sheet;
/// use serde_json::json;
///
/// let document = json!({
///     "Rates": [
///         { "Parameter ": "NSSF Rate", "Value": 0.06 },
///         { "Parameter": 0, "Upper Limit": 24000, "Rate": "10%" },
///         { "Parameter": "Notes" }
///     ]
/// });
///
/// let parsed = parse_rates_sheet("KE", &document).unwrap();
/// assert_eq!(parsed.flat_rates.len(), 1);
/// assert_eq!(parsed.bands.len(), 1);
/// assert_eq!(parsed.skipped.len(), 1);
/// ```
pub fn parse_rates_sheet(country: &str, document: &Value) -> EngineResult<ParsedSheet> {
    let unavailable = |message: String| EngineError::ConfigUnavailable {
        country: country.to_string(),
        message,
    };

    let sheets = document
        .as_object()
        .ok_or_else(|| unavailable("document is not a JSON object".to_string()))?;
    let rows = find_column(sheets, RATES_SHEET)
        .ok_or_else(|| unavailable(format!("missing '{}' sheet", RATES_SHEET)))?
        .as_array()
        .ok_or_else(|| unavailable(format!("'{}' sheet is not a list of rows", RATES_SHEET)))?;

    let mut parsed = ParsedSheet::default();

    for (index, row) in rows.iter().enumerate() {
        let Some(row) = row.as_object() else {
            parsed.skip(index, "row is not an object");
            continue;
        };

        match cell(row, LABEL_COLUMN) {
            Cell::Text(label) => parsed.flat_row(index, label, cell(row, VALUE_COLUMN)),
            Cell::Number(lower) => {
                parsed.band_row(index, lower, cell(row, RATE_COLUMN), cell(row, UPPER_COLUMN))
            }
            Cell::Empty => parsed.skip(index, "missing label"),
            Cell::Invalid => parsed.skip(index, "label cell is neither text nor a number"),
        }
    }

    Ok(parsed)
}

impl ParsedSheet {
    fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedRow {
            index,
            reason: reason.into(),
        });
    }

    fn flat_row(&mut self, index: usize, label: String, value: Cell) {
        let lowered = label.to_ascii_lowercase();
        if BAND_HEADER_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            debug!(row = index, label = %label, "Ignoring band table header row");
            return;
        }

        match value {
            Cell::Number(value) => {
                if self.flat_rates.contains_key(&label) {
                    self.skip(index, format!("duplicate label '{}'", label));
                } else {
                    self.flat_rates.insert(label, value);
                }
            }
            _ => self.skip(index, format!("label '{}' has no numeric value", label)),
        }
    }

    fn band_row(&mut self, index: usize, lower: Decimal, rate: Cell, upper: Cell) {
        let Cell::Number(rate) = rate else {
            self.skip(index, format!("band starting at {} has no numeric rate", lower));
            return;
        };
        let upper = match upper {
            Cell::Number(upper) => Some(upper),
            _ => None,
        };
        self.bands.push(Band::new(lower, upper, rate));
    }
}

/// Finds a column by header, ignoring surrounding whitespace and ASCII case.
fn find_column<'a>(row: &'a Map<String, Value>, header: &str) -> Option<&'a Value> {
    row.get(header).or_else(|| {
        row.iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(header))
            .map(|(_, value)| value)
    })
}

fn cell(row: &Map<String, Value>, header: &str) -> Cell {
    match find_column(row, header) {
        None | Some(Value::Null) => Cell::Empty,
        Some(Value::Number(number)) => match parse_decimal(&number.to_string()) {
            Some(value) => Cell::Number(value),
            None => Cell::Invalid,
        },
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Cell::Empty
            } else if let Some(value) = parse_numeric_text(text) {
                Cell::Number(value)
            } else {
                Cell::Text(text.to_string())
            }
        }
        Some(_) => Cell::Invalid,
    }
}

/// Parses a numeric cell stored as text: `"2,160"`, `"1.5%"`, `" 0.06 "`.
fn parse_numeric_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    match cleaned.strip_suffix('%') {
        Some(percent) => parse_decimal(percent).map(|value| value / Decimal::ONE_HUNDRED),
        None => parse_decimal(&cleaned),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_flat_rows_are_keyed_by_trimmed_label() {
        let document = json!({
            "Rates": [
                { "Parameter": "  NSSF Rate ", "Value": 0.06 },
                { "Parameter": "NSSF Cap", "Value": "2,160" }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert_eq!(parsed.flat_rates.get("NSSF Rate"), Some(&dec("0.06")));
        assert_eq!(parsed.flat_rates.get("NSSF Cap"), Some(&dec("2160")));
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_trailing_space_header_is_equivalent() {
        let document = json!({
            "Rates": [
                { "Parameter ": "SHIF Amount", "Value ": 1200 }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert_eq!(parsed.flat_rates.get("SHIF Amount"), Some(&dec("1200")));
    }

    #[test]
    fn test_band_rows_parsed_with_optional_upper() {
        let document = json!({
            "Rates": [
                { "Parameter": "Band Lower", "Value": 0, "Rate": "Rate" },
                { "Parameter": 0, "Upper Limit": 24000, "Rate": 0.1 },
                { "Parameter": "24000", "Upper Limit": "32,333", "Rate": "25%" },
                { "Parameter": 32333, "Upper Limit": "and above", "Rate": 0.3 }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert!(parsed.flat_rates.is_empty(), "band header must not become a flat rate");
        assert_eq!(
            parsed.bands,
            vec![
                Band::new(dec("0"), Some(dec("24000")), dec("0.1")),
                Band::new(dec("24000"), Some(dec("32333")), dec("0.25")),
                Band::new(dec("32333"), None, dec("0.3")),
            ]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_reserved_prefixes_are_case_insensitive() {
        let document = json!({
            "Rates": [
                { "Parameter": "TIER I", "Value": 7000 },
                { "Parameter": "bracket", "Value": 1 }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert!(parsed.flat_rates.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_reported() {
        let document = json!({
            "Rates": [
                { "Parameter": "NSSF Rate", "Value": 0.06 },
                { "Parameter": "Housing Levy Rate", "Value": "NaN" },
                { "Parameter": 24000, "Upper Limit": 32333 },
                { "Value": 5 },
                "not a row",
                { "Parameter": true, "Value": 1 }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert_eq!(parsed.flat_rates.len(), 1);
        assert!(parsed.bands.is_empty());

        let indices: Vec<usize> = parsed.skipped.iter().map(|row| row.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert!(parsed.skipped[0].reason.contains("Housing Levy Rate"));
        assert!(parsed.skipped[1].reason.contains("no numeric rate"));
    }

    #[test]
    fn test_duplicate_label_keeps_first() {
        let document = json!({
            "Rates": [
                { "Parameter": "NSSF Cap", "Value": 2160 },
                { "Parameter": "NSSF Cap ", "Value": 1080 }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert_eq!(parsed.flat_rates.get("NSSF Cap"), Some(&dec("2160")));
        assert_eq!(parsed.skipped.len(), 1);
        assert!(parsed.skipped[0].reason.contains("duplicate"));
    }

    #[test]
    fn test_scientific_notation_number() {
        let document = json!({
            "Rates": [
                { "Parameter": "Housing Levy Rate", "Value": 1.5e-2 }
            ]
        });

        let parsed = parse_rates_sheet("KE", &document).unwrap();
        assert_eq!(parsed.flat_rates.get("Housing Levy Rate"), Some(&dec("0.015")));
    }

    #[test]
    fn test_missing_rates_sheet_is_unavailable() {
        let document = json!({ "Summary": [] });

        match parse_rates_sheet("KE", &document) {
            Err(EngineError::ConfigUnavailable { country, message }) => {
                assert_eq!(country, "KE");
                assert!(message.contains("Rates"));
            }
            other => panic!("Expected ConfigUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_rates_sheet_must_be_a_list() {
        let document = json!({ "Rates": { "NSSF Rate": 0.06 } });
        assert!(matches!(
            parse_rates_sheet("KE", &document),
            Err(EngineError::ConfigUnavailable { .. })
        ));
    }

    #[test]
    fn test_document_must_be_an_object() {
        assert!(matches!(
            parse_rates_sheet("KE", &json!([1, 2, 3])),
            Err(EngineError::ConfigUnavailable { .. })
        ));
    }
}
