//! iterpat-validate - Entry Point
//!
//! Validates a serialized symbol snapshot (YAML or JSON) and prints the
//! report to stdout.
//!
//! | Exit status | Meaning |
//! |-------------|---------|
//! | 0 | Pass succeeded |
//! | 1 | Pass failed (at least one error) |
//! | 2 | Snapshot, configuration or internal error |

use anyhow::Context;
use clap::Parser;
use iterpat_validate::config::{OutputFormat, ValidatorSettings, init_debug};
use iterpat_validate::logging::init_logging;
use iterpat_validate::{Reporter, SymbolSnapshot, Validator};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line interface for iterpat-validate
#[derive(Parser, Debug)]
#[command(name = "iterpat-validate")]
#[command(about = "Validate Iterator / IterableAggregate role tags in a symbol snapshot")]
#[command(version)]
pub struct Cli {
    /// Snapshot file (`.json` for JSON, anything else is read as YAML)
    pub snapshot: PathBuf,

    /// Path to configuration file (default: ./.iterpat-validate.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report format: human, json or ci
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Include debug diagnostics in the report
    #[arg(long)]
    pub debug: bool,

    /// Log level for stderr output, overridden by ITERPAT_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    init_logging(&cli.log_level, cli.log_json)?;

    let mut settings =
        ValidatorSettings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(format) = cli.format {
        settings.output_format = format;
    }
    settings.debug = init_debug(cli.debug || settings.debug);

    let snapshot = SymbolSnapshot::load(&cli.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", cli.snapshot.display()))?;
    let report = Validator::new(settings.clone())
        .validate(&snapshot)
        .context("Validation aborted")?;

    let source = cli.snapshot.display().to_string();
    let rendered = Reporter::render(&report, &snapshot, Some(&source));
    print!("{}", Reporter::format(&rendered, settings.output_format));

    Ok(report.passed())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
