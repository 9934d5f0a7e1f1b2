use anyhow::{Context, Result};

use srn_cli::pipeline::{ExportFormat, RunOptions, RunResult, list_sheets, run};

use crate::cli::{ExportFormatArg, NormalizeArgs, SheetsArgs};
use crate::summary::print_sheets;

pub fn run_normalize(args: &NormalizeArgs) -> Result<RunResult> {
    let options = RunOptions {
        workbook: args.workbook.clone(),
        sheet: args.sheet.clone(),
        output_dir: args.output_dir.clone(),
        format: match args.format {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Xlsx => ExportFormat::Xlsx,
            ExportFormatArg::Both => ExportFormat::Both,
        },
        write_report: args.report_json,
        dry_run: args.dry_run,
    };
    run(&options)
}

pub fn run_sheets(args: &SheetsArgs) -> Result<()> {
    let names = list_sheets(&args.workbook)
        .with_context(|| format!("list sheets of {}", args.workbook.display()))?;
    print_sheets(&names);
    Ok(())
}
