//! Single-sheet normalization pipeline
//!
//! header discovery -> column validation -> per-row derivation -> stock
//! filter -> grouping

use crate::aggregate::{AggregateRow, aggregate};
use crate::config::{InputConfig, PivotConfig};
use crate::derive::derive_rows;
use crate::error::PivotError;
use crate::normalize::{Table, locate_header, promote_header, validate_columns};
use crate::reader::{CellValue, RawSheet};
use tracing::debug;

/// Whether pivot rows are keyed by network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Single network report: rows keyed by (address, category)
    None,
    /// Consolidated report: each file's network is part of the key
    PerFile,
}

impl NetworkMode {
    pub fn from_config(config: &PivotConfig) -> Self {
        if config.output.include_network {
            NetworkMode::PerFile
        } else {
            NetworkMode::None
        }
    }
}

/// Result of normalizing one sheet that passed validation
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Pivot rows of this file, in ascending (address, category) order
    Aggregated {
        network: Option<String>,
        rows: Vec<AggregateRow>,
    },
    /// No row had positive stock
    Empty,
}

impl FileOutcome {
    pub fn rows(&self) -> &[AggregateRow] {
        match self {
            FileOutcome::Aggregated { rows, .. } => rows,
            FileOutcome::Empty => &[],
        }
    }
}

/// Normalize a raw sheet into pivot rows.
pub fn normalize_sheet(
    sheet: RawSheet,
    config: &PivotConfig,
    mode: NetworkMode,
) -> Result<FileOutcome, PivotError> {
    let input = &config.input;

    let header_row = locate_header(&sheet, &input.marker)
        .ok_or_else(|| PivotError::HeaderMarkerNotFound(input.marker.clone()))?;
    debug!(header_row, "located header row");

    let table = promote_header(sheet, header_row);
    let columns = validate_columns(&table, input)?;

    let network = match mode {
        NetworkMode::PerFile => Some(network_name(&table, input)),
        NetworkMode::None => None,
    };

    let derived = derive_rows(&table, &columns);
    let rows = aggregate(&derived, network.as_deref());
    debug!(
        data_rows = derived.len(),
        groups = rows.len(),
        "aggregated sheet"
    );

    if rows.is_empty() {
        return Ok(FileOutcome::Empty);
    }
    Ok(FileOutcome::Aggregated { network, rows })
}

/// Network name of a file: the first non-empty cell of the network column,
/// or the configured fallback.
///
/// Whitespace-only text is a value, not a gap, and is returned as is.
fn network_name(table: &Table, input: &InputConfig) -> String {
    table
        .column_index(&input.network_column)
        .and_then(|col| {
            table
                .rows
                .iter()
                .map(|row| table.cell(row, col))
                .find(|cell| !cell.is_empty())
        })
        .map(CellValue::to_display_string)
        .unwrap_or_else(|| input.unknown_network.clone())
}
