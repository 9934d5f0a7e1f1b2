//! Normalization run pipeline with explicit stages.
//!
//! One invocation is synchronous and self-contained: open the workbook,
//! resolve the sheet, read the raw table (the file handle is released as soon
//! as the cells are copied out), run the normalizer, write the requested
//! exports. Concurrent invocations share nothing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use srn_ingest::{Workbook, read_sheet_table};
use srn_model::{NormalizeReport, TemplateConfig};
use srn_normalize::{NormalizedFrame, Normalizer};
use srn_output::{write_csv, write_report_json, write_xlsx};

/// Which export files to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Both,
}

impl ExportFormat {
    pub fn wants_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn wants_xlsx(self) -> bool {
        matches!(self, ExportFormat::Xlsx | ExportFormat::Both)
    }
}

/// Options for one normalization run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workbook: PathBuf,
    /// Sheet to normalize; the workbook's first sheet when `None`.
    pub sheet: Option<String>,
    /// Output directory; `<workbook parent>/output` when `None`.
    pub output_dir: Option<PathBuf>,
    pub format: ExportFormat,
    /// Write a JSON run report next to the exports.
    pub write_report: bool,
    /// Normalize and report without writing any files.
    pub dry_run: bool,
}

/// Result of one normalization run.
#[derive(Debug)]
pub struct RunResult {
    pub workbook: PathBuf,
    pub sheet: String,
    pub output_dir: PathBuf,
    pub frame: NormalizedFrame,
    pub report: NormalizeReport,
    pub csv_path: Option<PathBuf>,
    pub xlsx_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

/// List the sheet names of a workbook, in workbook order.
pub fn list_sheets(workbook: &Path) -> Result<Vec<String>> {
    let workbook = Workbook::open(workbook)?;
    Ok(workbook.sheet_names())
}

/// Run the full pipeline: ingest, normalize, export.
pub fn run(options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("run", workbook = %options.workbook.display());
    let _guard = span.enter();
    let start = Instant::now();

    let config = TemplateConfig::default();
    let header_rows = config.header_rows;
    let (sheet, table) = read_sheet_table(&options.workbook, options.sheet.as_deref(), header_rows)
        .with_context(|| format!("read {}", options.workbook.display()))?;

    let normalizer = Normalizer::new(config);
    let (frame, report) = normalizer.normalize(&sheet, table)?;

    let output_dir = resolve_output_dir(options);
    let mut result = RunResult {
        workbook: options.workbook.clone(),
        sheet,
        output_dir: output_dir.clone(),
        frame,
        report,
        csv_path: None,
        xlsx_path: None,
        report_path: None,
    };

    if options.dry_run {
        info!(
            sheet = %result.sheet,
            output_rows = result.report.output_rows,
            duration_ms = start.elapsed().as_millis(),
            "run complete (dry run)"
        );
        return Ok(result);
    }

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    if options.format.wants_csv() {
        let path = output_dir.join("normalized.csv");
        write_csv(&result.frame, &path)?;
        result.csv_path = Some(path);
    }
    if options.format.wants_xlsx() {
        let path = output_dir.join("normalized.xlsx");
        write_xlsx(
            &result.frame,
            &normalizer.config().export_sheet_name,
            &path,
        )?;
        result.xlsx_path = Some(path);
    }
    if options.write_report {
        result.report_path = Some(write_report_json(&output_dir, &result.report)?);
    }

    info!(
        sheet = %result.sheet,
        output_rows = result.report.output_rows,
        csv = result.csv_path.is_some(),
        xlsx = result.xlsx_path.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(result)
}

fn resolve_output_dir(options: &RunOptions) -> PathBuf {
    options.output_dir.clone().unwrap_or_else(|| {
        options
            .workbook
            .parent()
            .map_or_else(|| PathBuf::from("output"), |parent| parent.join("output"))
    })
}
