use srn_model::Cell;

/// One sheet read with the fixed two-row header layout.
///
/// The two label rows are kept separate so the normalizer can flatten them;
/// `rows` holds everything below the header, untyped except for what the
/// workbook itself types (numbers and date cells).
#[derive(Debug, Clone)]
pub struct SheetTable {
    /// Upper header row, one label per column (may be blank).
    pub upper_labels: Vec<String>,
    /// Lower header row, aligned with `upper_labels`.
    pub lower_labels: Vec<String>,
    /// Data rows, each padded to the full column count.
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    pub fn column_count(&self) -> usize {
        self.upper_labels.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
