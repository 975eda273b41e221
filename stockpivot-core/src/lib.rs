//! stockpivot-core: Core library for consolidating retail stock spreadsheets
//!
//! Each network exports stock balances in its own layout. This library finds
//! the real table inside each export, classifies items into product
//! categories, derives short codes from barcodes and builds one pivot of
//! in-stock codes per network, store and category.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod derive;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod writer;

pub use aggregate::AggregateRow;
pub use batch::{BatchReport, InputFile, Notice, Severity};
pub use config::PivotConfig;
pub use derive::Category;
pub use error::PivotError;
pub use pipeline::{FileOutcome, NetworkMode};
pub use writer::ReportLayout;

use reader::RawSheet;
use tracing::{info, warn};

/// Main pivot interface
pub struct StockPivot {
    config: PivotConfig,
    mode: NetworkMode,
}

impl StockPivot {
    /// Create a pivot builder with default configuration
    pub fn new() -> Self {
        Self::with_config(PivotConfig::default())
    }

    /// Create a pivot builder with custom configuration
    pub fn with_config(config: PivotConfig) -> Self {
        let mode = NetworkMode::from_config(&config);
        Self { config, mode }
    }

    /// Override the network mode chosen by the configuration
    pub fn with_mode(mut self, mode: NetworkMode) -> Self {
        self.mode = mode;
        self.config.output.include_network = mode == NetworkMode::PerFile;
        self
    }

    pub fn config(&self) -> &PivotConfig {
        &self.config
    }

    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    /// Report layout matching this builder's configuration and mode
    pub fn layout(&self) -> ReportLayout {
        ReportLayout::from_config(&self.config)
    }

    /// Normalize an already-read sheet
    pub fn process_sheet(&self, sheet: RawSheet) -> Result<FileOutcome, PivotError> {
        pipeline::normalize_sheet(sheet, &self.config, self.mode)
    }

    /// Read and normalize one input file
    pub fn process_file(&self, file: &InputFile) -> Result<FileOutcome, PivotError> {
        let sheet = reader::read_sheet(&file.bytes)?;
        self.process_sheet(sheet)
    }

    /// Process every file independently and merge the results.
    ///
    /// A failing file is reported and skipped; it never stops the batch.
    /// The merged rows are ordered by (network, address), keeping each
    /// file's category order within an address.
    pub fn process_batch(&self, files: &[InputFile]) -> BatchReport {
        let mut report = BatchReport::default();
        let mut empty_files = Vec::new();

        for file in files {
            info!(file = %file.name, "processing file");
            report.notices.push(Notice::for_file(
                &file.name,
                Severity::Info,
                "Processing file",
            ));

            match self.process_file(file) {
                Ok(FileOutcome::Aggregated { rows, .. }) => {
                    info!(file = %file.name, groups = rows.len(), "file aggregated");
                    report.rows.extend(rows);
                }
                Ok(FileOutcome::Empty) => {
                    info!(file = %file.name, "no items with positive stock");
                    empty_files.push(file.name.clone());
                }
                Err(e) => {
                    warn!(file = %file.name, error = %e, "file skipped");
                    let severity = match e {
                        PivotError::HeaderMarkerNotFound(_) => Severity::Warning,
                        PivotError::FileUnreadable(_) | PivotError::MissingRequiredColumn(_) => {
                            Severity::Error
                        }
                    };
                    report
                        .notices
                        .push(Notice::for_file(&file.name, severity, e.to_string()));
                }
            }
        }

        if report.rows.is_empty() {
            report.notices.push(Notice::for_batch(
                Severity::Warning,
                "No items with positive stock were found in any file",
            ));
            return report;
        }

        for name in empty_files {
            report.notices.push(Notice::for_file(
                name,
                Severity::Info,
                "No items with positive stock",
            ));
        }

        report.rows.sort_by(|a, b| a.cmp_report_order(b));
        report.notices.push(Notice::for_batch(
            Severity::Info,
            format!(
                "Processed {} file(s) into {} report row(s)",
                files.len(),
                report.rows.len()
            ),
        ));

        report
    }
}

impl Default for StockPivot {
    fn default() -> Self {
        Self::new()
    }
}
