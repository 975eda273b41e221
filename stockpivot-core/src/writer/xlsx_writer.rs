// ! XLSX writer for the pivot report

use super::ReportLayout;
use crate::aggregate::AggregateRow;
use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// Style 0 is the default, style 1 is bold (header row)
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

const HEADER_STYLE: &str = "1";

/// Serialize pivot rows as a single-sheet XLSX package
pub fn write_report_xlsx(rows: &[AggregateRow], layout: &ReportLayout) -> Result<Vec<u8>> {
    let mut zip_writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, Vec<u8>); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", ROOT_RELS.as_bytes().to_vec()),
        ("xl/workbook.xml", workbook_xml(&layout.sheet_name)?),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes().to_vec()),
        ("xl/styles.xml", STYLES.as_bytes().to_vec()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(rows, layout)?),
    ];

    for (name, content) in parts {
        zip_writer.start_file(name, options)?;
        zip_writer.write_all(&content)?;
    }

    Ok(zip_writer.finish()?.into_inner())
}

fn new_document() -> Result<Writer<Cursor<Vec<u8>>>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut writer = new_document()?;

    let mut workbook = BytesStart::new("workbook");
    workbook.push_attribute(("xmlns", NS_MAIN));
    workbook.push_attribute(("xmlns:r", NS_REL));
    writer.write_event(Event::Start(workbook))?;
    writer.write_event(Event::Start(BytesStart::new("sheets")))?;

    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", sheet_name));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    writer.write_event(Event::Empty(sheet))?;

    writer.write_event(Event::End(BytesEnd::new("sheets")))?;
    writer.write_event(Event::End(BytesEnd::new("workbook")))?;

    Ok(writer.into_inner().into_inner())
}

fn worksheet_xml(rows: &[AggregateRow], layout: &ReportLayout) -> Result<Vec<u8>> {
    let mut writer = new_document()?;

    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", NS_MAIN));
    worksheet.push_attribute(("xmlns:r", NS_REL));
    writer.write_event(Event::Start(worksheet))?;

    write_column_widths(&mut writer, layout)?;

    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let headers: Vec<&str> = layout.headers().collect();
    write_row(&mut writer, 0, &headers, Some(HEADER_STYLE))?;

    for (index, row) in rows.iter().enumerate() {
        let values = layout.values(row);
        write_row(&mut writer, index as u32 + 1, &values, None)?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;

    Ok(writer.into_inner().into_inner())
}

fn write_column_widths(writer: &mut Writer<Cursor<Vec<u8>>>, layout: &ReportLayout) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("cols")))?;
    for (index, width) in layout.column_widths().iter().enumerate() {
        let position = (index + 1).to_string();
        let width = width.to_string();
        let mut col = BytesStart::new("col");
        col.push_attribute(("min", position.as_str()));
        col.push_attribute(("max", position.as_str()));
        col.push_attribute(("width", width.as_str()));
        col.push_attribute(("customWidth", "1"));
        writer.write_event(Event::Empty(col))?;
    }
    writer.write_event(Event::End(BytesEnd::new("cols")))?;
    Ok(())
}

fn write_row(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    row: u32,
    values: &[&str],
    style: Option<&str>,
) -> Result<()> {
    let row_number = (row + 1).to_string();
    let mut row_start = BytesStart::new("row");
    row_start.push_attribute(("r", row_number.as_str()));
    writer.write_event(Event::Start(row_start))?;

    for (col, value) in values.iter().enumerate() {
        let reference = cell_reference(row, col as u32);
        let mut cell = BytesStart::new("c");
        cell.push_attribute(("r", reference.as_str()));
        if let Some(style) = style {
            cell.push_attribute(("s", style));
        }
        cell.push_attribute(("t", "inlineStr"));
        writer.write_event(Event::Start(cell))?;
        writer.write_event(Event::Start(BytesStart::new("is")))?;

        let mut text = BytesStart::new("t");
        if value.trim() != *value {
            text.push_attribute(("xml:space", "preserve"));
        }
        writer.write_event(Event::Start(text))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new("t")))?;

        writer.write_event(Event::End(BytesEnd::new("is")))?;
        writer.write_event(Event::End(BytesEnd::new("c")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

/// Excel-style reference for a zero-based position (0, 0 -> "A1")
fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Convert column number to letter (0 -> A, 1 -> B, etc.)
fn col_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}
