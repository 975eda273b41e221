use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stockpivot_core::writer::write_report_to_path;
use stockpivot_core::{InputFile, NetworkMode, Notice, PivotConfig, Severity, StockPivot};
use tracing::warn;

mod formatter;
mod logging;

#[derive(Parser)]
#[command(name = "stockpivot")]
#[command(about = "Consolidated stock pivot from network inventory spreadsheets", long_about = None)]
#[command(version)]
struct Cli {
    /// Spreadsheet exports to process (xlsx, xls, xlsb, ods)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Report file (defaults to the configured file name)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Single-network report: no network column
    #[arg(long)]
    single: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Show what would be reported without writing the report file
    #[arg(long)]
    dry_run: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        PivotConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("stockpivot.toml");
        if default_config_path.exists() {
            PivotConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            PivotConfig::default()
        }
    };
    config.validate().context("Invalid configuration")?;

    let mut pivot = StockPivot::with_config(config);
    if cli.single {
        pivot = pivot.with_mode(NetworkMode::None);
    }

    // Unreadable paths are reported like any other failing file
    let mut inputs = Vec::with_capacity(cli.files.len());
    let mut read_failures = Vec::new();
    for path in &cli.files {
        match InputFile::from_path(path) {
            Ok(input) => inputs.push(input),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read input");
                read_failures.push(Notice::for_file(
                    path.display().to_string(),
                    Severity::Error,
                    format!("{:#}", e),
                ));
            }
        }
    }

    let mut report = pivot.process_batch(&inputs);
    read_failures.append(&mut report.notices);
    report.notices = read_failures;

    let layout = pivot.layout();
    let written_to = if report.has_rows() && !cli.dry_run {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&pivot.config().output.file_name));
        write_report_to_path(&report.rows, &layout, &path)?;
        Some(path)
    } else {
        None
    };

    // Output results
    match cli.format {
        OutputFormat::Human => formatter::print_human(&report, &layout, written_to.as_deref()),
        OutputFormat::Json => formatter::print_json(&report, written_to.as_deref())?,
    }

    // Exit with appropriate code
    let exit_code = if !report.has_rows() && report.error_count() > 0 {
        1
    } else {
        0
    };

    std::process::exit(exit_code);
}
