//! The normalization pipeline.
//!
//! Stage order is load-bearing: coercion and the positive filter assume the
//! positional rename and string cleanup have already run. Every stage is a
//! deterministic function of its input; per-cell failures degrade to missing
//! values and are counted in the run report, never retried.

use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, info_span};

use srn_ingest::SheetTable;
use srn_model::{
    Cell, DATE_COLUMN, GROSS_SALES_COLUMN, NormalizeError, NormalizeReport, STORE_NAME_COLUMN,
    TemplateConfig,
};

use crate::dates::parse_day_first;
use crate::flatten::flatten_labels;
use crate::frame::{NormalizedFrame, build_frame};
use crate::stages::{clean_cell, coerce_numeric, last_chars};

const STORE_NAME_KEEP: usize = 4;

/// Pure sheet-to-canonical-table transformation, configured once with the
/// immutable template description. Holds no other state; concurrent
/// invocations share nothing.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: TemplateConfig,
}

impl Normalizer {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Run the full pipeline over one sheet.
    ///
    /// Fails only on structural problems (fewer columns than the template
    /// requires); cell-level problems become missing values and row drops,
    /// accounted for in the returned report.
    pub fn normalize(
        &self,
        sheet: &str,
        table: SheetTable,
    ) -> Result<(NormalizedFrame, NormalizeReport)> {
        let span = info_span!("normalize", sheet = sheet);
        let _guard = span.enter();
        let start = Instant::now();

        let mut report = NormalizeReport {
            sheet: sheet.to_string(),
            input_rows: table.row_count(),
            ..NormalizeReport::default()
        };

        // Stage 1: flatten composite headers. Inspectability only; the labels
        // are logged and discarded, column identity stays positional.
        let flattened = flatten_labels(&table);
        debug!(labels = %flattened.join(" ; "), "flattened header labels");

        // Stage 2: positional rename. Fewer columns than the template names
        // is a structural error, never silent padding.
        let expected = self.config.column_count();
        if flattened.len() < expected {
            return Err(NormalizeError::TooFewColumns {
                found: flattened.len(),
                expected,
            }
            .into());
        }
        let mut rows = table.rows;
        for row in &mut rows {
            row.truncate(expected);
            row.resize(expected, Cell::Missing);
        }

        // Stage 3: whole-table string cleanup.
        for row in &mut rows {
            for cell in row.iter_mut() {
                let cleaned = clean_cell(std::mem::replace(cell, Cell::Missing));
                *cell = cleaned;
            }
        }

        // Stage 4: drop fully empty rows.
        report.dropped_empty += drop_empty_rows(&mut rows);

        // Stage 5: parse the date column, day before month.
        if let Some(date_idx) = self.config.column_index(DATE_COLUMN) {
            report.unparsed_dates = parse_date_column(&mut rows, date_idx);
        }

        // Stage 6: store name keeps its last four characters.
        if let Some(store_idx) = self.config.column_index(STORE_NAME_COLUMN) {
            truncate_store_names(&mut rows, store_idx);
        }

        // Stage 7: coerce the numeric columns.
        let numeric_indices: Vec<usize> = self
            .config
            .final_columns
            .iter()
            .enumerate()
            .filter(|(_, name)| self.config.is_numeric(name))
            .map(|(idx, _)| idx)
            .collect();
        report.unparsed_numbers = coerce_numeric_columns(&mut rows, &numeric_indices);

        // Stage 8: keep only rows with a strictly positive Gross Sales.
        if let Some(gross_idx) = self.config.column_index(GROSS_SALES_COLUMN) {
            report.dropped_non_positive = filter_positive(&mut rows, gross_idx);
        }

        // Stage 9: final sweep for rows emptied by parsing/coercion.
        report.dropped_empty += drop_empty_rows(&mut rows);

        report.output_rows = rows.len();
        let data = build_frame(&self.config, &rows)?;
        info!(
            sheet = sheet,
            input_rows = report.input_rows,
            output_rows = report.output_rows,
            dropped_empty = report.dropped_empty,
            dropped_non_positive = report.dropped_non_positive,
            duration_ms = start.elapsed().as_millis(),
            "normalization complete"
        );
        Ok((
            NormalizedFrame {
                sheet: sheet.to_string(),
                data,
            },
            report,
        ))
    }
}

fn drop_empty_rows(rows: &mut Vec<Vec<Cell>>) -> usize {
    let before = rows.len();
    rows.retain(|row| !row.iter().all(Cell::is_missing));
    before - rows.len()
}

/// Returns the number of present values that failed to parse as dates.
fn parse_date_column(rows: &mut [Vec<Cell>], date_idx: usize) -> usize {
    let mut unparsed = 0;
    for row in rows.iter_mut() {
        let cell = &mut row[date_idx];
        match cell {
            Cell::Date(_) | Cell::Missing => {}
            Cell::Text(text) => match parse_day_first(text) {
                Some(date) => *cell = Cell::Date(date),
                None => {
                    unparsed += 1;
                    *cell = Cell::Missing;
                }
            },
            // A bare number in the date column carries no calendar meaning.
            Cell::Number(_) => {
                unparsed += 1;
                *cell = Cell::Missing;
            }
        }
    }
    unparsed
}

fn truncate_store_names(rows: &mut [Vec<Cell>], store_idx: usize) {
    for row in rows.iter_mut() {
        let cell = &mut row[store_idx];
        if let Some(text) = cell.to_text() {
            *cell = Cell::Text(last_chars(&text, STORE_NAME_KEEP));
        }
    }
}

/// Returns the number of present values that failed numeric coercion.
fn coerce_numeric_columns(rows: &mut [Vec<Cell>], numeric_indices: &[usize]) -> usize {
    let mut unparsed = 0;
    for row in rows.iter_mut() {
        for &idx in numeric_indices {
            let cell = &mut row[idx];
            match coerce_numeric(cell) {
                Some(value) => *cell = Cell::Number(value),
                None => {
                    if !cell.is_missing() {
                        unparsed += 1;
                    }
                    *cell = Cell::Missing;
                }
            }
        }
    }
    unparsed
}

/// Re-coerces Gross Sales (idempotent) and drops rows without a strictly
/// positive value. Returns the number of rows dropped.
fn filter_positive(rows: &mut Vec<Vec<Cell>>, gross_idx: usize) -> usize {
    for row in rows.iter_mut() {
        let cell = &mut row[gross_idx];
        *cell = match coerce_numeric(cell) {
            Some(value) => Cell::Number(value),
            None => Cell::Missing,
        };
    }
    let before = rows.len();
    rows.retain(|row| matches!(&row[gross_idx], Cell::Number(value) if *value > 0.0));
    before - rows.len()
}
