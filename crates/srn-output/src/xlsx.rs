//! Single-sheet XLSX export.
//!
//! Hand-assembled OOXML container: the minimal package parts, inline strings
//! for text cells (no shared-strings table), and sparse rows where values are
//! missing. Numeric columns are written as native number cells.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataType};
use quick_xml::Writer as XmlWriter;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::write::{SimpleFileOptions, ZipWriter};

use srn_normalize::NormalizedFrame;

use crate::polars_utils::{any_to_f64, any_to_string};

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELS_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="1"><fill><patternFill patternType="none"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#;

/// Serialize the frame as a single-sheet workbook.
pub fn xlsx_bytes(frame: &NormalizedFrame, sheet_name: &str) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let static_parts: [(&str, &str); 4] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/styles.xml", STYLES),
    ];
    for (name, contents) in static_parts {
        zip.start_file(name, options)
            .with_context(|| format!("start xlsx part {name}"))?;
        zip.write_all(contents.as_bytes())
            .with_context(|| format!("write xlsx part {name}"))?;
    }

    zip.start_file("xl/workbook.xml", options)
        .context("start workbook part")?;
    zip.write_all(&workbook_xml(sheet_name)?)
        .context("write workbook part")?;

    zip.start_file("xl/worksheets/sheet1.xml", options)
        .context("start worksheet part")?;
    zip.write_all(&sheet_xml(frame)?)
        .context("write worksheet part")?;

    let cursor = zip.finish().context("finish xlsx container")?;
    Ok(cursor.into_inner())
}

/// Write the XLSX export to `path`.
pub fn write_xlsx(frame: &NormalizedFrame, sheet_name: &str, path: &Path) -> Result<()> {
    let bytes = xlsx_bytes(frame, sheet_name)?;
    fs::write(path, bytes).with_context(|| format!("write xlsx file {}", path.display()))?;
    Ok(())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let mut workbook = BytesStart::new("workbook");
    workbook.push_attribute(("xmlns", MAIN_NS));
    workbook.push_attribute(("xmlns:r", RELS_NS));
    xml.write_event(Event::Start(workbook))?;
    xml.write_event(Event::Start(BytesStart::new("sheets")))?;
    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", sheet_name));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    xml.write_event(Event::Empty(sheet))?;
    xml.write_event(Event::End(BytesEnd::new("sheets")))?;
    xml.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(xml.into_inner())
}

fn sheet_xml(frame: &NormalizedFrame) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", MAIN_NS));
    xml.write_event(Event::Start(worksheet))?;
    xml.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let columns = frame.data.get_columns();

    // Header row.
    write_row_start(&mut xml, 1)?;
    for (col_idx, column) in columns.iter().enumerate() {
        write_text_cell(&mut xml, &cell_ref(1, col_idx), column.name().as_str())?;
    }
    xml.write_event(Event::End(BytesEnd::new("row")))?;

    // Data rows; missing cells are omitted entirely.
    for idx in 0..frame.data.height() {
        let row_number = idx + 2;
        write_row_start(&mut xml, row_number)?;
        for (col_idx, column) in columns.iter().enumerate() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            if matches!(value, AnyValue::Null) {
                continue;
            }
            let reference = cell_ref(row_number, col_idx);
            if column.dtype() == &DataType::Float64 {
                if let Some(number) = any_to_f64(value) {
                    write_number_cell(&mut xml, &reference, number)?;
                }
            } else {
                write_text_cell(&mut xml, &reference, &any_to_string(value))?;
            }
        }
        xml.write_event(Event::End(BytesEnd::new("row")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(xml.into_inner())
}

fn write_row_start(xml: &mut XmlWriter<Vec<u8>>, row_number: usize) -> Result<()> {
    let number = row_number.to_string();
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", number.as_str()));
    xml.write_event(Event::Start(row))?;
    Ok(())
}

fn write_text_cell(xml: &mut XmlWriter<Vec<u8>>, reference: &str, text: &str) -> Result<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference));
    cell.push_attribute(("t", "inlineStr"));
    xml.write_event(Event::Start(cell))?;
    xml.write_event(Event::Start(BytesStart::new("is")))?;
    let mut t = BytesStart::new("t");
    if text.trim() != text {
        t.push_attribute(("xml:space", "preserve"));
    }
    xml.write_event(Event::Start(t))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new("t")))?;
    xml.write_event(Event::End(BytesEnd::new("is")))?;
    xml.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_number_cell(xml: &mut XmlWriter<Vec<u8>>, reference: &str, value: f64) -> Result<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference));
    xml.write_event(Event::Start(cell))?;
    xml.write_event(Event::Start(BytesStart::new("v")))?;
    xml.write_event(Event::Text(BytesText::new(&value.to_string())))?;
    xml.write_event(Event::End(BytesEnd::new("v")))?;
    xml.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

/// A1-style reference for a zero-indexed column and 1-indexed row.
fn cell_ref(row_number: usize, col_idx: usize) -> String {
    let mut letters = String::new();
    let mut remainder = col_idx;
    loop {
        letters.insert(0, (b'A' + (remainder % 26) as u8) as char);
        if remainder < 26 {
            break;
        }
        remainder = remainder / 26 - 1;
    }
    format!("{letters}{row_number}")
}
