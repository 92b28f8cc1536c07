//! Numeric Normalizer Module
//! Turns pt-BR formatted cells ("R$ 1.234,56", "12,5") into canonical numbers.

use thiserror::Error;

/// Currency marker stripped before any digit grouping is touched.
const CURRENCY_MARKER: &str = "R$";

/// Whitespace artifacts found in spreadsheet exports.
const SPACE_CHARS: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

#[derive(Error, Debug, Clone, PartialEq)]
#[error("'{raw}' is not a number (normalized to '{normalized}')")]
pub struct NumericError {
    pub raw: String,
    pub normalized: String,
}

/// Normalize a raw cell into a string `f64::from_str` understands.
///
/// Missing, empty and whitespace-only cells become `"0"`.
pub fn normalize(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "0".to_string();
    };

    let cleaned: String = value
        .replace(CURRENCY_MARKER, "")
        .chars()
        .filter(|c| !SPACE_CHARS.contains(c) && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        "0".to_string()
    } else {
        cleaned
    }
}

/// Normalize and parse into a canonical value.
pub fn parse_canonical(value: Option<&str>) -> Result<f64, NumericError> {
    let normalized = normalize(value);
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NumericError {
            raw: value.unwrap_or_default().to_string(),
            normalized,
        }),
    }
}

/// Strip thousands separators and spaces from an integer cell.
pub fn clean_integer(value: &str) -> String {
    value
        .chars()
        .filter(|c| !SPACE_CHARS.contains(c) && *c != '.')
        .collect()
}

/// Parse a percentage cell such as `"5,23%"` into `5.23`.
pub fn parse_percentage(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .replace('%', "")
        .replace(',', ".")
        .trim()
        .to_string();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
