//! tenantdoc: report generator for fabric tenant configuration exports
//!
//! Usage:
//!   tenantdoc tenant.json -o report.md                 # Markdown report, PNG diagrams
//!   tenantdoc tenant.json -o report.json               # Block list as JSON
//!   tenantdoc tenant.json -o report.md --image-format dot
//!   tenantdoc tenant.json --lint                       # Warnings only

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tenantdoc_common::{init_tracing, LogFormat};
use tenantdoc_inspect::{generate, lint, DocumentFormat, ImageFormat, ReportSettings, Severity};

/// tenantdoc: cross-referenced report of a fabric tenant export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tenant configuration export (JSON)
    input: PathBuf,

    /// Report file to write
    #[arg(short, long, required_unless_present = "lint")]
    output: Option<PathBuf>,

    /// Report settings file (TOML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Directory diagrams are written to
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Diagram file format
    #[arg(long, value_enum)]
    image_format: Option<ImageFormat>,

    /// Report format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<DocumentFormat>,

    /// Only run the configuration checks and print their findings
    #[arg(long)]
    lint: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log format (compact, json)
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level, args.log_format).context("Failed to initialize logging")?;

    if args.lint {
        let warnings = lint(&args.input)
            .with_context(|| format!("Failed to check {}", args.input.display()))?;
        if warnings.is_empty() {
            println!("No warnings found.");
            return Ok(());
        }
        for w in &warnings {
            println!("[{}] {}: {}", w.severity, w.code, w.message);
        }
        // Exit with non-zero if there are errors
        if warnings.iter().any(|w| w.severity == Severity::Error) {
            process::exit(1);
        }
        return Ok(());
    }

    let output = args
        .output
        .context("An output file is required unless --lint is given")?;

    let mut settings = match &args.settings {
        Some(path) => ReportSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ReportSettings::default(),
    };
    if let Some(dir) = args.image_dir {
        settings.image_dir = dir;
    }
    if let Some(format) = args.image_format {
        settings.image_format = format;
    }
    let format = args
        .format
        .unwrap_or_else(|| DocumentFormat::from_path(&output));

    info!(
        input = %args.input.display(),
        output = %output.display(),
        version = env!("CARGO_PKG_VERSION"),
        "Generating tenant report"
    );

    let report = generate(&settings, &args.input, &output, format)
        .with_context(|| format!("Failed to document {}", args.input.display()))?;

    info!(
        output = %output.display(),
        diagrams = report.images.len(),
        "Report written"
    );
    Ok(())
}
