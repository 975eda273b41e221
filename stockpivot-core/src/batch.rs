//! Batch reporting: per-file notices and the consolidated row set

use crate::aggregate::AggregateRow;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Severity level of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A message for the user about one file, or about the whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Input file name; `None` for batch-level notices
    pub file: Option<String>,
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn for_file(file: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            severity,
            message: message.into(),
        }
    }

    pub fn for_batch(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: None,
            severity,
            message: message.into(),
        }
    }
}

/// An input spreadsheet: display name plus raw bytes
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, named by its file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Everything a batch produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Pivot rows of all files, ordered by (network, address)
    pub rows: Vec<AggregateRow>,
    pub notices: Vec<Notice>,
}

impl BatchReport {
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices.iter().filter(|n| n.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }
}
