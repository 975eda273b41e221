//! File-scoped pipeline errors

use thiserror::Error;

/// Reasons a single input file contributes nothing to the report.
///
/// None of these abort a batch; the orchestrator records them against the
/// file name and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PivotError {
    #[error("cannot read workbook: {0}")]
    FileUnreadable(String),

    #[error("header row marker '{0}' not found in the first column")]
    HeaderMarkerNotFound(String),

    #[error("missing column: {0}")]
    MissingRequiredColumn(String),
}
