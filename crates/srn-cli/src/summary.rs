use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::AnyValue;

use srn_cli::pipeline::RunResult;
use srn_normalize::NormalizedFrame;
use srn_output::any_to_string;

pub fn print_summary(result: &RunResult) {
    println!("Workbook: {}", result.workbook.display());
    println!("Sheet: {}", result.sheet);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let report = &result.report;
    table.add_row(vec![Cell::new("Input"), Cell::new(report.input_rows)]);
    table.add_row(vec![
        Cell::new("Dropped (empty)"),
        count_cell(report.dropped_empty, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Dropped (Gross Sales not positive)"),
        count_cell(report.dropped_non_positive, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Unparseable dates"),
        count_cell(report.unparsed_dates, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Unparseable numbers"),
        count_cell(report.unparsed_numbers, Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Output").add_attribute(Attribute::Bold),
        Cell::new(report.output_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    match (&result.csv_path, &result.xlsx_path) {
        (None, None) => println!("No files written (dry run)"),
        (csv, xlsx) => {
            if let Some(path) = csv {
                println!("CSV: {}", path.display());
            }
            if let Some(path) = xlsx {
                println!("XLSX: {}", path.display());
            }
        }
    }
    if let Some(path) = &result.report_path {
        println!("Report: {}", path.display());
    }
}

/// Print the first `rows` normalized rows, for a quick look at the output.
pub fn print_preview(frame: &NormalizedFrame, rows: usize) {
    if rows == 0 || frame.record_count() == 0 {
        return;
    }
    let shown = rows.min(frame.record_count());
    let mut table = Table::new();
    let columns = frame.data.get_columns();
    table.set_header(
        columns
            .iter()
            .map(|column| header_cell(column.name().as_str()))
            .collect::<Vec<Cell>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..shown {
        let row: Vec<Cell> = columns
            .iter()
            .map(|column| Cell::new(any_to_string(column.get(idx).unwrap_or(AnyValue::Null))))
            .collect();
        table.add_row(row);
    }
    println!("{table}");
    if shown < frame.record_count() {
        println!("({shown} of {} rows shown)", frame.record_count());
    }
}

pub fn print_sheets(names: &[String]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Sheet")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, name) in names.iter().enumerate() {
        table.add_row(vec![Cell::new(idx + 1), Cell::new(name)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn align_column(table: &mut Table, idx: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(idx) {
        column.set_cell_alignment(alignment);
    }
}
