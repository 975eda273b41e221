// ! Writer module for the consolidated report

mod xlsx_writer;

pub use xlsx_writer::write_report_xlsx;

use crate::aggregate::AggregateRow;
use crate::config::PivotConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Sheet name and column headers of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub sheet_name: String,
    /// Header of the network column; `None` drops the column
    pub network_header: Option<String>,
    pub address_header: String,
    pub category_header: String,
    pub codes_header: String,
}

impl ReportLayout {
    pub fn from_config(config: &PivotConfig) -> Self {
        Self {
            sheet_name: config.output.sheet_name.clone(),
            network_header: config
                .output
                .include_network
                .then(|| config.input.network_column.clone()),
            address_header: config.input.address_column.clone(),
            category_header: config.output.category_header.clone(),
            codes_header: config.output.codes_header.clone(),
        }
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.network_header
            .as_deref()
            .into_iter()
            .chain([
                self.address_header.as_str(),
                self.category_header.as_str(),
                self.codes_header.as_str(),
            ])
    }

    /// Cell values of one report row, aligned with [`ReportLayout::headers`]
    pub fn values<'a>(&self, row: &'a AggregateRow) -> Vec<&'a str> {
        let mut values = Vec::with_capacity(4);
        if self.network_header.is_some() {
            values.push(row.network.as_deref().unwrap_or_default());
        }
        values.push(row.address.as_str());
        values.push(row.category.as_str());
        values.push(row.codes.as_str());
        values
    }

    fn column_widths(&self) -> Vec<u32> {
        let mut widths = Vec::with_capacity(4);
        if self.network_header.is_some() {
            widths.push(18);
        }
        widths.extend([50, 22, 60]);
        widths
    }
}

/// Serialize the report to XLSX bytes
pub fn write_report(rows: &[AggregateRow], layout: &ReportLayout) -> Result<Vec<u8>> {
    write_report_xlsx(rows, layout)
}

/// Serialize the report and write it to `path`
pub fn write_report_to_path<P: AsRef<Path>>(
    rows: &[AggregateRow],
    layout: &ReportLayout,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = write_report(rows, layout)?;
    fs::write(path, bytes).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
