//! Header discovery and schema normalization
//!
//! Network exports put a free-form preamble (report title, dates, filters)
//! above the real table. The header row is found by a marker cell in the
//! first column, promoted to column names, and checked for the columns the
//! pipeline needs.

use crate::config::InputConfig;
use crate::error::PivotError;
use crate::reader::{CellValue, RawSheet};
use std::collections::HashMap;

/// Rows below the header, addressable by column name
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    index: HashMap<String, usize>,
}

impl Table {
    /// Position of a column by its trimmed name.
    ///
    /// When the header repeats a name, the rightmost column wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Cell of `row` in column `col`; short rows read as empty
    pub fn cell<'a>(&self, row: &'a [CellValue], col: usize) -> &'a CellValue {
        row.get(col).unwrap_or(&CellValue::Empty)
    }
}

/// Column positions of the fields the pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub address: usize,
    pub description: usize,
    pub barcode: usize,
    pub stock: usize,
}

/// Find the header row: the first row whose first cell is exactly `marker`.
///
/// Later rows carrying the marker are treated as ordinary data.
pub fn locate_header(sheet: &RawSheet, marker: &str) -> Option<usize> {
    sheet
        .cells_in_column(0)
        .position(|cell| cell.as_text() == Some(marker))
}

/// Turn the header row into column names and keep only the rows beneath it.
pub fn promote_header(sheet: RawSheet, header_row: usize) -> Table {
    let mut rows = sheet.rows;
    let data = if header_row < rows.len() {
        rows.split_off(header_row + 1)
    } else {
        Vec::new()
    };

    let columns: Vec<String> = rows
        .get(header_row)
        .map(|header| {
            header
                .iter()
                .map(|cell| cell.to_display_string().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut index = HashMap::new();
    for (position, name) in columns.iter().enumerate() {
        // Blank header cells cannot be looked up
        if !name.is_empty() {
            index.insert(name.clone(), position);
        }
    }

    Table {
        columns,
        rows: data,
        index,
    }
}

/// Check that every required column is present, in configuration order.
pub fn validate_columns(table: &Table, input: &InputConfig) -> Result<RequiredColumns, PivotError> {
    let lookup = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| PivotError::MissingRequiredColumn(name.to_string()))
    };

    Ok(RequiredColumns {
        address: lookup(&input.address_column)?,
        description: lookup(&input.description_column)?,
        barcode: lookup(&input.barcode_column)?,
        stock: lookup(&input.stock_column)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|s| {
                if s.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::from(*s)
                }
            })
            .collect()
    }

    fn sample_sheet() -> RawSheet {
        RawSheet::new(vec![
            text_row(&["Отчёт по остаткам", ""]),
            text_row(&["", "за период"]),
            text_row(&["Сеть", " Адрес торгового объекта ", "Описание номенклатуры", "Штрих_код", "Остаток"]),
            text_row(&["Гринн", "ул. Ленина, 1", "Тесс чай", "4600000123456", "5"]),
            text_row(&["Сеть", "ул. Мира, 2", "ГринФилд чай", "4600000654321", "0"]),
        ])
    }

    #[test]
    fn test_locate_header_first_match() {
        let sheet = sample_sheet();
        assert_eq!(locate_header(&sheet, "Сеть"), Some(2));
    }

    #[test]
    fn test_locate_header_missing() {
        let sheet = RawSheet::new(vec![text_row(&["Network", "Address"])]);
        assert_eq!(locate_header(&sheet, "Сеть"), None);
        assert_eq!(locate_header(&RawSheet::default(), "Сеть"), None);
    }

    #[test]
    fn test_locate_header_is_exact() {
        let sheet = RawSheet::new(vec![
            text_row(&[" Сеть"]),
            text_row(&["сеть"]),
            vec![CellValue::Number(1.0)],
        ]);
        assert_eq!(locate_header(&sheet, "Сеть"), None);
    }

    #[test]
    fn test_promote_header() {
        let table = promote_header(sample_sheet(), 2);

        assert_eq!(table.columns[1], "Адрес торгового объекта");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column_index("Остаток"), Some(4));
        // Duplicate marker row below the header stays as data
        assert_eq!(table.rows[1][0], CellValue::from("Сеть"));
    }

    #[test]
    fn test_promote_header_duplicate_and_blank_names() {
        let sheet = RawSheet::new(vec![
            text_row(&["Сеть", "Остаток", "", "Остаток"]),
            text_row(&["A", "1", "x", "2"]),
        ]);
        let table = promote_header(sheet, 0);

        assert_eq!(table.column_index("Остаток"), Some(3));
        assert_eq!(table.column_index(""), None);
        assert_eq!(table.columns.len(), 4);
    }

    #[test]
    fn test_validate_columns() {
        let table = promote_header(sample_sheet(), 2);
        let required = validate_columns(&table, &InputConfig::default()).unwrap();

        assert_eq!(
            required,
            RequiredColumns {
                address: 1,
                description: 2,
                barcode: 3,
                stock: 4,
            }
        );
    }

    #[test]
    fn test_validate_reports_first_missing_column() {
        let sheet = RawSheet::new(vec![text_row(&["Сеть", "Описание номенклатуры", "Штрих_код"])]);
        let table = promote_header(sheet, 0);

        let err = validate_columns(&table, &InputConfig::default()).unwrap_err();
        assert_eq!(
            err,
            PivotError::MissingRequiredColumn("Адрес торгового объекта".to_string())
        );
        assert_eq!(err.to_string(), "missing column: Адрес торгового объекта");
    }
}
