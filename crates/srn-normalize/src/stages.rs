//! Cell-level transformations used by the pipeline stages.

use srn_model::Cell;

/// Text values treated as missing-value markers after trimming.
const MISSING_MARKERS: [&str; 2] = ["nan", "None"];

/// Trim a text cell; blank text and the literal markers become missing.
/// Numbers and dates pass through untouched.
pub fn clean_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
                Cell::Missing
            } else if trimmed.len() == text.len() {
                Cell::Text(text)
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        other => other,
    }
}

/// Parse an amount string after stripping thousands-separator commas.
/// Non-finite parses count as failures.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Numeric view of a cell. Idempotent: an already-numeric cell yields its
/// value unchanged, so repeating coercion never alters data.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(value) => Some(*value),
        Cell::Text(text) => parse_amount(text),
        Cell::Missing | Cell::Date(_) => None,
    }
}

/// Last `count` characters of `text` (whole string when shorter). Counts
/// characters, not bytes.
pub fn last_chars(text: &str, count: usize) -> String {
    let total = text.chars().count();
    if total <= count {
        return text.to_string();
    }
    text.chars().skip(total - count).collect()
}
