//! Canonical DataFrame construction.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use srn_model::{Cell, TemplateConfig};

/// The canonical table produced by one normalization run.
///
/// Numeric fields are `Float64` series, text fields `String` series with
/// nulls as the missing-value marker; `Date` holds ISO 8601 `YYYY-MM-DD`
/// strings. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    /// Sheet the frame was normalized from.
    pub sheet: String,
    pub data: DataFrame,
}

impl NormalizedFrame {
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }
}

/// Build the canonical frame from finished pipeline rows.
///
/// Every row must already be exactly `config.column_count()` cells wide.
pub fn build_frame(config: &TemplateConfig, rows: &[Vec<Cell>]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(config.column_count());
    for (idx, name) in config.final_columns.iter().enumerate() {
        if config.is_numeric(name) {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row[idx].as_number()).collect();
            columns.push(Series::new(name.as_str().into(), values).into());
        } else {
            let values: Vec<Option<String>> = rows.iter().map(|row| row[idx].to_text()).collect();
            columns.push(Series::new(name.as_str().into(), values).into());
        }
    }
    DataFrame::new(columns).context("build canonical dataframe")
}
