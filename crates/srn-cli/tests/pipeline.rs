//! End-to-end tests for the normalization run pipeline.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

use srn_cli::pipeline::{ExportFormat, RunOptions, list_sheets, run};
use srn_model::{NormalizeError, NormalizeReport};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="March" sheetId="1" r:id="rId1"/>
</sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

// The sales template shape: title rows, composite header on rows 4-5 spanning
// 16 columns (column P carries the last header label), data from row 6.
const TEMPLATE_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Monthly Sales Report</t></is></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>Period: March 2024</t></is></c></row>
<row r="4">
<c r="A4" t="inlineStr"><is><t>Store</t></is></c>
<c r="B4" t="inlineStr"><is><t>Store</t></is></c>
<c r="C4" t="inlineStr"><is><t>Store</t></is></c>
<c r="E4" t="inlineStr"><is><t>Sales</t></is></c>
<c r="P4" t="inlineStr"><is><t>Avg</t></is></c>
</row>
<row r="5">
<c r="A5" t="inlineStr"><is><t>No</t></is></c>
<c r="B5" t="inlineStr"><is><t>Code</t></is></c>
<c r="C5" t="inlineStr"><is><t>Name</t></is></c>
<c r="D5" t="inlineStr"><is><t>Date</t></is></c>
<c r="E5" t="inlineStr"><is><t>Gross</t></is></c>
<c r="P5" t="inlineStr"><is><t>Value</t></is></c>
</row>
<row r="6">
<c r="A6" t="inlineStr"><is><t>1</t></is></c>
<c r="B6" t="inlineStr"><is><t>S01</t></is></c>
<c r="C6" t="inlineStr"><is><t>SHOP-001</t></is></c>
<c r="D6" t="inlineStr"><is><t>05/03/2024</t></is></c>
<c r="E6"><v>1200.5</v></c>
</row>
<row r="7">
<c r="A7" t="inlineStr"><is><t>2</t></is></c>
<c r="B7" t="inlineStr"><is><t>S02</t></is></c>
<c r="C7" t="inlineStr"><is><t>SHOP-002</t></is></c>
<c r="D7" t="inlineStr"><is><t>06/03/2024</t></is></c>
<c r="E7"><v>0</v></c>
</row>
<row r="8"><c r="A8" t="inlineStr"><is><t xml:space="preserve">   </t></is></c></row>
<row r="9">
<c r="A9" t="inlineStr"><is><t>3</t></is></c>
<c r="B9" t="inlineStr"><is><t>S03</t></is></c>
<c r="C9" t="inlineStr"><is><t>STORE 99</t></is></c>
<c r="D9" t="inlineStr"><is><t>bad date</t></is></c>
<c r="E9" t="inlineStr"><is><t>2,500.75</t></is></c>
</row>
</sheetData>
</worksheet>"#;

// Only ten columns wide: header labels stop at column J.
const SHORT_SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="4"><c r="A4" t="inlineStr"><is><t>Store</t></is></c><c r="J4" t="inlineStr"><is><t>Last</t></is></c></row>
<row r="5"><c r="A5" t="inlineStr"><is><t>Code</t></is></c></row>
<row r="6"><c r="A6" t="inlineStr"><is><t>S01</t></is></c></row>
</sheetData>
</worksheet>"#;

fn write_workbook(dir: &Path, name: &str, sheet_xml: &str) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create workbook file");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/worksheets/sheet1.xml", sheet_xml),
    ];
    for (entry, contents) in parts {
        zip.start_file(entry, options).expect("start zip entry");
        zip.write_all(contents.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish workbook zip");
    path
}

fn run_options(workbook: PathBuf, output_dir: &Path) -> RunOptions {
    RunOptions {
        workbook,
        sheet: None,
        output_dir: Some(output_dir.to_path_buf()),
        format: ExportFormat::Both,
        write_report: false,
        dry_run: false,
    }
}

#[test]
fn normalizes_a_template_workbook_end_to_end() {
    let dir = TempDir::new().expect("temp dir");
    let workbook = write_workbook(dir.path(), "march.xlsx", TEMPLATE_SHEET);
    let output_dir = dir.path().join("out");
    let mut options = run_options(workbook, &output_dir);
    options.write_report = true;

    let result = run(&options).expect("run pipeline");
    assert_eq!(result.sheet, "March");
    assert_eq!(result.report.input_rows, 4);
    assert_eq!(result.report.output_rows, 2);
    assert_eq!(result.report.dropped_empty, 1);
    assert_eq!(result.report.dropped_non_positive, 1);
    assert_eq!(result.report.unparsed_dates, 1);
    assert!(result.report.reconciles());

    let csv_path = result.csv_path.as_ref().expect("csv written");
    let csv = std::fs::read_to_string(csv_path).expect("read csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Row No.,Store Code,Store Name,Date,Gross Sales"));
    assert!(lines[1].starts_with("1,S01,-001,2024-03-05,1200.5"));
    // Unparseable date becomes an empty field; the comma amount was coerced.
    assert!(lines[2].starts_with("3,S03,E 99,,2500.75"));

    assert!(result.xlsx_path.as_ref().expect("xlsx written").exists());

    let report_path = result.report_path.as_ref().expect("report written");
    let report: NormalizeReport =
        serde_json::from_str(&std::fs::read_to_string(report_path).expect("read report"))
            .expect("parse report");
    assert_eq!(report, result.report);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let workbook = write_workbook(dir.path(), "march.xlsx", TEMPLATE_SHEET);
    let output_dir = dir.path().join("out");
    let mut options = run_options(workbook, &output_dir);
    options.dry_run = true;

    let result = run(&options).expect("run pipeline");
    assert_eq!(result.report.output_rows, 2);
    assert!(result.csv_path.is_none());
    assert!(result.xlsx_path.is_none());
    assert!(!output_dir.exists());
}

#[test]
fn csv_only_format_skips_the_spreadsheet() {
    let dir = TempDir::new().expect("temp dir");
    let workbook = write_workbook(dir.path(), "march.xlsx", TEMPLATE_SHEET);
    let output_dir = dir.path().join("out");
    let mut options = run_options(workbook, &output_dir);
    options.format = ExportFormat::Csv;

    let result = run(&options).expect("run pipeline");
    assert!(result.csv_path.is_some());
    assert!(result.xlsx_path.is_none());
    assert!(!output_dir.join("normalized.xlsx").exists());
}

#[test]
fn short_template_fails_structurally() {
    let dir = TempDir::new().expect("temp dir");
    let workbook = write_workbook(dir.path(), "short.xlsx", SHORT_SHEET);
    let options = run_options(workbook, &dir.path().join("out"));

    let error = run(&options).unwrap_err();
    match error.downcast_ref::<NormalizeError>() {
        Some(NormalizeError::TooFewColumns { found, expected }) => {
            assert_eq!(*found, 10);
            assert_eq!(*expected, 16);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_sheet_is_reported_with_available_names() {
    let dir = TempDir::new().expect("temp dir");
    let workbook = write_workbook(dir.path(), "march.xlsx", TEMPLATE_SHEET);
    let mut options = run_options(workbook, &dir.path().join("out"));
    options.sheet = Some("April".to_string());

    let error = run(&options).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("April"), "{message}");
    assert!(message.contains("March"), "{message}");
}

#[test]
fn lists_sheet_names() {
    let dir = TempDir::new().expect("temp dir");
    let workbook = write_workbook(dir.path(), "march.xlsx", TEMPLATE_SHEET);
    let names = list_sheets(&workbook).expect("list sheets");
    assert_eq!(names, vec!["March"]);
}
