//! Output formatters for batch reports

use anyhow::Result;
use colored::*;
use std::path::Path;
use stockpivot_core::{AggregateRow, BatchReport, Notice, ReportLayout, Severity};

/// Print notices and the pivot table in human-readable format
pub fn print_human(report: &BatchReport, layout: &ReportLayout, written_to: Option<&Path>) {
    for notice in &report.notices {
        print_notice(notice);
    }
    println!();

    if !report.has_rows() {
        return;
    }

    print_table(&report.rows, layout);
    println!();

    println!("{}", "Summary:".bold().underline());
    println!("  {} {}", "Rows:".bold(), report.rows.len());
    if report.error_count() > 0 {
        println!("  {} {}", "Errors:".red().bold(), report.error_count());
    }
    let warning_count = report.count(Severity::Warning);
    if warning_count > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), warning_count);
    }

    match written_to {
        Some(path) => println!("{} {}", "✓ Report written to".green().bold(), path.display()),
        None => println!("{}", "[DRY RUN] Report not written".bright_black()),
    }
}

fn print_notice(notice: &Notice) {
    let severity_str = match notice.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARN".yellow().bold(),
        Severity::Info => "INFO".blue().bold(),
    };

    match &notice.file {
        Some(file) => println!("{} [{}] {}", severity_str, file.cyan(), notice.message),
        None => println!("{} {}", severity_str, notice.message.bold()),
    }
}

fn print_table(rows: &[AggregateRow], layout: &ReportLayout) {
    let headers: Vec<&str> = layout.headers().collect();
    let body: Vec<Vec<&str>> = rows.iter().map(|row| layout.values(row)).collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            body.iter()
                .map(|values| values[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = pad_line(&headers, &widths);
    println!("{}", header_line.bold());
    for values in &body {
        println!("{}", pad_line(values, &widths));
    }
}

fn pad_line(values: &[&str], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(value.chars().count());
            format!("{}{}", value, " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Print notices, rows and summary in JSON format
pub fn print_json(report: &BatchReport, written_to: Option<&Path>) -> Result<()> {
    let output = serde_json::json!({
        "output": written_to.map(|p| p.display().to_string()),
        "rows": report.rows,
        "notices": report.notices,
        "summary": {
            "rows": report.rows.len(),
            "errors": report.error_count(),
            "warnings": report.count(Severity::Warning),
            "info": report.count(Severity::Info),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_line_counts_characters() {
        let line = pad_line(&["Тесс", "A"], &[6, 3]);
        assert_eq!(line, "Тесс    A");
    }
}
