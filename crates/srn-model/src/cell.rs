//! Cell values for raw and intermediate tables.
//!
//! Missing is a distinct state rather than an empty string or zero: the
//! positive-sales filter and empty-row elimination both depend on telling
//! "no value" apart from "blank text".

use chrono::NaiveDate;

/// A single untyped cell from the source sheet or an intermediate stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Text rendering of a present value, as the truncation stage sees it.
    /// Numbers render without trailing zeros, dates as ISO 8601.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Text(text) => Some(text.clone()),
            Cell::Number(value) => Some(format_number(*value)),
            Cell::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_number(value: f64) -> String {
    let rendered = format!("{value}");
    if !rendered.contains('.') {
        return rendered;
    }
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
