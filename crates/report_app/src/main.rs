use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use report_app::{ReportConfig, ReportError, ReportPipeline, ReportSelectors, Upload};
use report_core::logging;

#[derive(Parser)]
#[command(name = "datareport")]
#[command(about = "Generate PDF, CSV or Excel reports from CSV/XLSX data")]
#[command(version)]
struct Cli {
    /// CSV or XLSX file to report on
    input: PathBuf,

    /// `summary` or `full_data`
    #[arg(long, default_value = "summary")]
    report_type: String,

    /// `pdf`, `csv` or `excel`
    #[arg(long, default_value = "pdf")]
    output_format: String,

    /// Page size for full-data PDFs: A4, A3, A2 or A1
    #[arg(long, default_value = "A4")]
    page_size: String,

    /// Directory the report is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Alternate configuration file
    #[arg(long, env = "DATAREPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for log files (default `~/.datareport/logs`)
    #[arg(long, env = "DATAREPORT_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&ReportError::Unexpected(format!("{e:#}"))),
    };

    // Keep the guard alive so buffered log lines are flushed on exit.
    let initialized = match cli.log_dir.as_deref() {
        Some(dir) => {
            logging::init_logging_to_dir(dir, &logging::default_filter(&config.log_level))
        }
        None => logging::init_logging(&config.log_level),
    };
    let _guard = match initialized {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging unavailable: {e:#}");
            None
        }
    };
    info!(debug = config.debug, "datareport starting");

    match run(&cli, config) {
        Ok(path) => {
            info!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ReportConfig> {
    match path {
        Some(path) => {
            let mut config = ReportConfig::load_from_path(path)?;
            config.apply_env();
            Ok(config)
        }
        None => ReportConfig::load(),
    }
}

fn run(cli: &Cli, config: ReportConfig) -> Result<PathBuf, ReportError> {
    let filename = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))
        .map_err(|e| ReportError::Unexpected(format!("{e:#}")))?;

    let selectors = ReportSelectors::new(&cli.report_type, &cli.output_format, &cli.page_size);
    let report = ReportPipeline::new(config).generate(&Upload::new(filename, bytes), &selectors)?;

    let path = cli.output_dir.join(&report.filename);
    std::fs::write(&path, &report.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))
        .map_err(|e| ReportError::Unexpected(format!("{e:#}")))?;

    info!(
        mime_type = report.mime_type,
        size = report.bytes.len(),
        "Saved {}",
        report.filename
    );
    Ok(path)
}

/// Prints the JSON error body and maps the status to an exit code.
fn fail(err: &ReportError) -> ExitCode {
    error!("{err}");
    eprintln!("{}", err.body().to_json());
    ExitCode::from(exit_code(err))
}

fn exit_code(err: &ReportError) -> u8 {
    if err.status_code() < 500 { 1 } else { 2 }
}
