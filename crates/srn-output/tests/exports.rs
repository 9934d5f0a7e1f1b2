use calamine::{Data, Reader, Xlsx, open_workbook};
use tempfile::TempDir;

use srn_ingest::SheetTable;
use srn_model::{Cell, NormalizeReport, TemplateConfig};
use srn_normalize::{NormalizedFrame, Normalizer};
use srn_output::{csv_bytes, write_report_json, write_xlsx, xlsx_bytes};

fn sample_frame() -> NormalizedFrame {
    let width = 16;
    let mut first = vec![Cell::Missing; width];
    first[0] = Cell::Text("1".into());
    first[1] = Cell::Text("S01".into());
    first[2] = Cell::Text("SHOP-001".into());
    first[3] = Cell::Text("05/03/2024".into());
    first[4] = Cell::Text("1,200.50".into());
    first[13] = Cell::Text("3".into());
    let mut second = vec![Cell::Missing; width];
    second[0] = Cell::Text("2".into());
    second[1] = Cell::Text("S02, Annex".into());
    second[2] = Cell::Text("SHOP-002".into());
    second[4] = Cell::Text("75".into());
    let table = SheetTable {
        upper_labels: vec![String::new(); width],
        lower_labels: vec![String::new(); width],
        rows: vec![first, second],
    };
    let normalizer = Normalizer::new(TemplateConfig::default());
    let (frame, _) = normalizer.normalize("Report", table).expect("normalize");
    frame
}

#[test]
fn csv_has_header_and_one_record_per_row() {
    let frame = sample_frame();
    let bytes = csv_bytes(&frame).expect("csv bytes");
    let text = String::from_utf8(bytes).expect("utf-8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Row No.,Store Code,Store Name,Date,Gross Sales"));
    assert!(lines[1].starts_with("1,S01,-001,2024-03-05,1200.5"));
    // A comma inside a field gets quoted, not split.
    assert!(lines[2].contains("\"S02, Annex\""));
}

#[test]
fn csv_renders_missing_as_empty_fields() {
    let frame = sample_frame();
    let text = String::from_utf8(csv_bytes(&frame).expect("csv bytes")).expect("utf-8");
    let second = text.lines().nth(2).expect("second record");
    // Date was never supplied for the second row.
    let fields: Vec<&str> = second.split(',').collect();
    assert!(fields.len() >= 16);
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("record")).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[1][3], "");
}

#[test]
fn xlsx_round_trips_through_a_real_reader() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("normalized.xlsx");
    let frame = sample_frame();
    write_xlsx(&frame, "normalized", &path).expect("write xlsx");

    let mut workbook: Xlsx<_> = open_workbook(&path).expect("reopen xlsx");
    assert_eq!(workbook.sheet_names(), vec!["normalized"]);
    let range = workbook
        .worksheet_range("normalized")
        .expect("read normalized sheet");
    // Header row plus two data rows, 16 columns wide.
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("Row No.".into())));
    assert_eq!(
        range.get_value((0, 4)),
        Some(&Data::String("Gross Sales".into()))
    );
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("-001".into())));
    assert_eq!(range.get_value((1, 4)), Some(&Data::Float(1200.5)));
    assert_eq!(range.get_value((2, 4)), Some(&Data::Float(75.0)));
}

#[test]
fn exports_agree_on_header_and_row_count() {
    let frame = sample_frame();
    let csv_text = String::from_utf8(csv_bytes(&frame).expect("csv")).expect("utf-8");
    let csv_rows = csv_text.lines().count();

    let bytes = xlsx_bytes(&frame, "normalized").expect("xlsx bytes");
    let mut workbook: Xlsx<_> =
        Xlsx::new(std::io::Cursor::new(bytes)).expect("open xlsx from memory");
    let range = workbook
        .worksheet_range("normalized")
        .expect("read normalized sheet");
    assert_eq!(range.height(), csv_rows);
}

#[test]
fn report_json_lands_in_the_output_dir() {
    let dir = TempDir::new().expect("temp dir");
    let report = NormalizeReport {
        sheet: "Report".to_string(),
        input_rows: 3,
        output_rows: 2,
        dropped_empty: 0,
        dropped_non_positive: 1,
        unparsed_dates: 0,
        unparsed_numbers: 0,
    };
    let path = write_report_json(dir.path(), &report).expect("write report");
    let text = std::fs::read_to_string(&path).expect("read report");
    let parsed: NormalizeReport = serde_json::from_str(&text).expect("parse report");
    assert_eq!(parsed, report);
}
