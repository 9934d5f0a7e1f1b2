//! Per-run accounting for the normalization pipeline.

use serde::{Deserialize, Serialize};

/// Counters describing what one normalization run did to the source rows.
///
/// Per-cell failures (unparseable dates, non-numeric amounts) are recoverable
/// and only counted here; row drops are the empty-row sweeps and the positive
/// Gross Sales filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Sheet the run read from.
    pub sheet: String,
    /// Data rows read below the header rows.
    pub input_rows: usize,
    /// Rows in the canonical table.
    pub output_rows: usize,
    /// Rows dropped because every field was missing (both sweeps combined).
    pub dropped_empty: usize,
    /// Rows dropped by the positive Gross Sales filter.
    pub dropped_non_positive: usize,
    /// Date cells that failed day-first parsing and became missing.
    pub unparsed_dates: usize,
    /// Numeric cells that failed coercion and became missing.
    pub unparsed_numbers: usize,
}

impl NormalizeReport {
    pub fn dropped_rows(&self) -> usize {
        self.dropped_empty + self.dropped_non_positive
    }

    /// True when every input row is accounted for as kept or dropped.
    pub fn reconciles(&self) -> bool {
        self.output_rows + self.dropped_rows() == self.input_rows
    }
}
