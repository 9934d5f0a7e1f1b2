//! Run report JSON output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use srn_model::NormalizeReport;

/// Write the run report as pretty-printed JSON under `output_dir`.
/// Returns the written path.
pub fn write_report_json(output_dir: &Path, report: &NormalizeReport) -> Result<PathBuf> {
    let path = output_dir.join("normalize_report.json");
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
