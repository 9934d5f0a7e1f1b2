//! Export surface for the canonical sales table.
//!
//! Both exports carry the same header and rows: CSV (UTF-8, comma-delimited,
//! no index column) and a single-sheet XLSX workbook. A JSON run report can
//! be written alongside them.

mod csv;
mod polars_utils;
mod report;
mod xlsx;

pub use csv::{csv_bytes, write_csv};
pub use polars_utils::{any_to_f64, any_to_string};
pub use report::write_report_json;
pub use xlsx::{write_xlsx, xlsx_bytes};
