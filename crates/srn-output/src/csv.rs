//! CSV export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::AnyValue;

use srn_normalize::NormalizedFrame;

use crate::polars_utils::any_to_string;

/// Serialize the frame as UTF-8 CSV: the 16 field names as the header row,
/// one record per canonical row, no index column.
pub fn csv_bytes(frame: &NormalizedFrame) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_records(&mut writer, frame)?;
    writer.into_inner().context("flush csv buffer")
}

/// Write the CSV export to `path`.
pub fn write_csv(frame: &NormalizedFrame, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("create csv file {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    write_records(&mut writer, frame)?;
    writer.flush().context("flush csv file")?;
    Ok(())
}

fn write_records<W: Write>(writer: &mut csv::Writer<W>, frame: &NormalizedFrame) -> Result<()> {
    let columns = frame.data.get_columns();
    writer
        .write_record(columns.iter().map(|column| column.name().as_str()))
        .context("write csv header")?;
    for idx in 0..frame.data.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer.write_record(&record).context("write csv row")?;
    }
    Ok(())
}
