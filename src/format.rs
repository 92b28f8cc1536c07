//! Value Formatters Module
//! Renders canonical values as pt-BR display strings.
//!
//! Formatters never fail: anything that cannot be read as a number falls
//! back to a fixed sentinel so the dashboard always has something to show.

use crate::data::normalize::{clean_integer, parse_percentage};

pub const CURRENCY_FALLBACK: &str = "R$ 0,00";
pub const PERCENTAGE_FALLBACK: &str = "0,00%";
pub const DECIMAL_FALLBACK: &str = "0,00";
pub const INTEGER_FALLBACK: &str = "0";

/// A cell handed to a formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl Cell<'_> {
    /// Plain float conversion, no locale handling.
    fn to_f64(self) -> Option<f64> {
        let value = match self {
            Cell::Missing => None,
            Cell::Number(v) => Some(v),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}

impl From<f64> for Cell<'_> {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(value)
        }
    }
}

impl From<u64> for Cell<'_> {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<i64> for Cell<'_> {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<usize> for Cell<'_> {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl<'a> From<&'a str> for Cell<'a> {
    fn from(value: &'a str) -> Self {
        Cell::Text(value)
    }
}

impl<'a, T: Into<Cell<'a>>> From<Option<T>> for Cell<'a> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// Insert `.` every three digits from the right: `1234567` -> `1.234.567`.
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Split a value into (negative, whole, cents) after rounding to two places.
///
/// Rounds half away from zero on the value scaled by 100.
fn split_cents(value: f64) -> Option<(bool, i128, u8)> {
    let cents = (value.abs() * 100.0).round();
    if !cents.is_finite() || cents >= i128::MAX as f64 {
        return None;
    }
    let cents = cents as i128;
    Some((value < 0.0 && cents > 0, cents / 100, (cents % 100) as u8))
}

fn render_fixed(value: f64, grouped: bool) -> Option<String> {
    let (negative, whole, cents) = split_cents(value)?;
    let whole = if grouped {
        group_thousands(whole)
    } else {
        whole.to_string()
    };
    let sign = if negative { "-" } else { "" };
    Some(format!("{sign}{whole},{cents:02}"))
}

/// `R$ 1.234,50`
pub fn format_currency<'a>(value: impl Into<Cell<'a>>) -> String {
    value
        .into()
        .to_f64()
        .and_then(|v| render_fixed(v, true))
        .map(|s| format!("R$ {s}"))
        .unwrap_or_else(|| CURRENCY_FALLBACK.to_string())
}

/// `12,34%`. Text may already carry the `%` suffix and a `,` decimal.
pub fn format_percentage<'a>(value: impl Into<Cell<'a>>) -> String {
    let number = match value.into() {
        Cell::Missing => None,
        Cell::Number(v) => Some(v).filter(|v| v.is_finite()),
        Cell::Text(s) => parse_percentage(s),
    };

    number
        .and_then(|v| render_fixed(v, false))
        .map(|s| format!("{s}%"))
        .unwrap_or_else(|| PERCENTAGE_FALLBACK.to_string())
}

/// `1.234,57`
pub fn format_decimal<'a>(value: impl Into<Cell<'a>>) -> String {
    value
        .into()
        .to_f64()
        .and_then(|v| render_fixed(v, true))
        .unwrap_or_else(|| DECIMAL_FALLBACK.to_string())
}

/// `12.345`. Text may carry thousands separators and (non-breaking) spaces.
pub fn format_integer<'a>(value: impl Into<Cell<'a>>) -> String {
    let number = match value.into() {
        Cell::Missing => None,
        Cell::Number(v) if v.is_finite() && v.abs() < i128::MAX as f64 => Some(v.trunc() as i128),
        Cell::Number(_) => None,
        Cell::Text(s) => clean_integer(s).parse::<i128>().ok(),
    };

    number
        .map(group_thousands)
        .unwrap_or_else(|| INTEGER_FALLBACK.to_string())
}
