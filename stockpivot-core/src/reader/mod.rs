//! Excel/ODS file reader using calamine

use crate::error::PivotError;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

pub mod sheet;

pub use sheet::{CellValue, RawSheet};

/// Read the first worksheet of a workbook held in memory.
///
/// The format (xlsx, xlsm, xlsb, xls, ods) is detected from the content.
pub fn read_sheet(bytes: &[u8]) -> Result<RawSheet, PivotError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| PivotError::FileUnreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PivotError::FileUnreadable("workbook contains no worksheets".to_string()))?
        .map_err(|e| PivotError::FileUnreadable(e.to_string()))?;

    Ok(parse_range(&range))
}

/// Convert a calamine range into a grid anchored at A1.
///
/// Calamine trims leading empty rows and columns from a range; anchoring at
/// A1 keeps column 0 equal to column A, which is where the header marker
/// lives.
fn parse_range(range: &Range<Data>) -> RawSheet {
    let Some((max_row, max_col)) = range.end() else {
        return RawSheet::default();
    };

    let rows = (0..=max_row)
        .map(|row| {
            (0..=max_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(parse_cell_value)
                        .unwrap_or(CellValue::Empty)
                })
                .collect()
        })
        .collect();

    RawSheet::new(rows)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
