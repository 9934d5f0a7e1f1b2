//! CLI argument definitions for the sales report normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "srn",
    version,
    about = "Sales Report Normalizer - flatten fixed-layout sales report exports into raw data",
    long_about = "Normalize a fixed-layout Excel sales report (two-row header on sheet rows 4-5)\n\
                  into the canonical 16-column table, and export it as CSV and XLSX.\n\
                  Rows without a strictly positive Gross Sales value are dropped."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a workbook sheet and export the canonical table.
    Normalize(NormalizeArgs),

    /// List the sheets in a workbook.
    Sheets(SheetsArgs),
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Path to the sales report workbook (.xlsx or .xls).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Sheet to normalize (default: the first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Output directory for the exports (default: <WORKBOOK parent>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Export format to generate.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: ExportFormatArg,

    /// Write a JSON run report next to the exports.
    #[arg(long = "report-json")]
    pub report_json: bool,

    /// Normalize and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the first N normalized rows after the summary.
    #[arg(long = "preview", value_name = "ROWS", default_value_t = 0)]
    pub preview: usize,
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// Path to the workbook (.xlsx or .xls).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Xlsx,
    Both,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
