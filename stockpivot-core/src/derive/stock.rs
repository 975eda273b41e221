//! Stock quantity coercion

use crate::reader::CellValue;

/// Read a stock quantity from a cell.
///
/// Text may use a comma as decimal separator. Empty and unparsable cells
/// count as zero. Negative values are returned as-is.
pub fn coerce_stock(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Empty => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(text) => text.replace(',', ".").trim().parse().unwrap_or(0.0),
    }
}
