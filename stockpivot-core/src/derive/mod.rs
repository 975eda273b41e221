//! Per-row derived fields
//!
//! Each derivation is total: a cell that cannot be interpreted degrades to a
//! fixed default instead of failing the row.

pub mod category;
pub mod short_code;
pub mod stock;

pub use category::{Category, classify};
pub use short_code::{FALLBACK_CODE, short_code};
pub use stock::coerce_stock;

use crate::normalize::{RequiredColumns, Table};
use crate::reader::CellValue;

/// One data row after classification and coercion
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    /// Store address; `None` when the address cell is empty
    pub address: Option<String>,
    pub category: Category,
    pub short_code: String,
    pub stock: f64,
}

/// Derive the fields of every data row, in source order.
pub fn derive_rows(table: &Table, columns: &RequiredColumns) -> Vec<DerivedRow> {
    table
        .rows
        .iter()
        .map(|row| {
            let address = match table.cell(row, columns.address) {
                CellValue::Empty => None,
                cell => Some(cell.to_display_string()),
            };
            DerivedRow {
                address,
                category: classify(table.cell(row, columns.description)),
                short_code: short_code(table.cell(row, columns.barcode)),
                stock: coerce_stock(table.cell(row, columns.stock)),
            }
        })
        .collect()
}
