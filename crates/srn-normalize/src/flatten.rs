//! Composite header flattening.
//!
//! The template spreads each column label over two header rows. Flattening
//! joins the trimmed, non-empty parts with `" | "` into one inspectable
//! string per column. The result is logged and then discarded: column
//! identity is positional, never textual.

use srn_ingest::SheetTable;

const LABEL_SEPARATOR: &str = " | ";

/// Flatten the two header rows into one label per column.
///
/// A column whose labels are all blank yields an empty string. Column order
/// is preserved; this never fails.
pub fn flatten_labels(table: &SheetTable) -> Vec<String> {
    table
        .upper_labels
        .iter()
        .zip(table.lower_labels.iter())
        .map(|(upper, lower)| flatten_pair(upper, lower))
        .collect()
}

fn flatten_pair(upper: &str, lower: &str) -> String {
    let parts: Vec<&str> = [upper, lower]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    parts.join(LABEL_SEPARATOR)
}
