//! Workbook access on top of calamine.
//!
//! A [`Workbook`] owns the open file handle; [`read_sheet_table`] scopes the
//! handle so it is released as soon as the selected sheet's cells have been
//! copied out. Sheet rows are addressed absolutely, so the fixed header
//! position holds even when the used range does not start at A1.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, DataType, Range, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use srn_model::Cell;

use crate::error::IngestError;
use crate::sheet_table::SheetTable;

pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Workbook {
    /// Open an `.xlsx` or `.xls` workbook, auto-detecting the container.
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        let sheets = open_workbook_auto(path).map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "workbook opened");
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_owned()
    }

    /// Read one sheet with the two header rows at the given zero-indexed
    /// positions.
    pub fn read_sheet(
        &mut self,
        name: &str,
        header_rows: (usize, usize),
    ) -> Result<SheetTable, IngestError> {
        let available = self.sheet_names();
        if !available.iter().any(|sheet| sheet == name) {
            return Err(IngestError::SheetNotFound {
                name: name.to_string(),
                available,
            });
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|source| IngestError::Sheet {
                name: name.to_string(),
                source,
            })?;
        build_sheet_table(name, &range, header_rows)
    }
}

/// Open a workbook, resolve the sheet (first sheet when `None`), and read it.
///
/// The workbook handle lives only for the duration of this call.
pub fn read_sheet_table(
    path: &Path,
    sheet: Option<&str>,
    header_rows: (usize, usize),
) -> Result<(String, SheetTable), IngestError> {
    let mut workbook = Workbook::open(path)?;
    let names = workbook.sheet_names();
    let Some(first) = names.first() else {
        return Err(IngestError::NoSheets);
    };
    let sheet = sheet.unwrap_or(first.as_str()).to_string();
    let table = workbook.read_sheet(&sheet, header_rows)?;
    Ok((sheet, table))
}

fn build_sheet_table(
    name: &str,
    range: &Range<Data>,
    header_rows: (usize, usize),
) -> Result<SheetTable, IngestError> {
    let (first_header, second_header) = header_rows;
    let too_short = |last_row: usize| IngestError::TooShort {
        name: name.to_string(),
        last_row,
        header_start: first_header + 1,
        header_end: second_header + 1,
    };
    let Some((last_row, last_col)) = range.end() else {
        return Err(too_short(0));
    };
    let last_row = last_row as usize;
    let width = last_col as usize + 1;
    if last_row < second_header {
        return Err(too_short(last_row + 1));
    }

    let upper_labels = label_row(range, first_header, width);
    let lower_labels = label_row(range, second_header, width);
    let mut rows = Vec::with_capacity(last_row - second_header);
    for row_idx in (second_header + 1)..=last_row {
        let mut row = Vec::with_capacity(width);
        for col_idx in 0..width {
            row.push(convert_cell(
                range.get_value((row_idx as u32, col_idx as u32)),
            ));
        }
        rows.push(row);
    }
    debug!(
        sheet = name,
        columns = width,
        rows = rows.len(),
        "sheet read"
    );
    Ok(SheetTable {
        upper_labels,
        lower_labels,
        rows,
    })
}

fn label_row(range: &Range<Data>, row: usize, width: usize) -> Vec<String> {
    (0..width)
        .map(|col| label_text(range.get_value((row as u32, col as u32))))
        .collect()
}

fn label_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(text)) => text.clone(),
        Some(other) => other.as_string().unwrap_or_else(|| other.to_string()),
    }
}

fn convert_cell(cell: Option<&Data>) -> Cell {
    let Some(cell) = cell else {
        return Cell::Missing;
    };
    match cell {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Text(if *value { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(datetime) => Cell::Date(datetime.date()),
            None => cell.as_string().map(Cell::Text).unwrap_or(Cell::Missing),
        },
        Data::DurationIso(text) => Cell::Text(text.clone()),
    }
}
