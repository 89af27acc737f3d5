//! ATS validator binary
//!
//! Validates a resume or cover letter and writes a report. Exit status:
//! 0 for PASS or WARNING, 1 for FAIL (or any finding with `--fail-on-warning`),
//! 2 when validation could not run.

use anyhow::{Context, Result};
use ats_engine::{AtsEngine, ConsoleRenderer, ReportRenderer, ValidationRequest};
use ats_types::DocumentKind;
use ats_validate::{
    exit_code, load_config, parse_document_kind, render_rule_listing, OutputFormat, EXIT_ERROR,
    EXIT_OK,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ats-validate")]
#[command(version, about = "Check a resume for ATS parsing problems")]
struct Args {
    /// Markdown or plain-text document to validate
    #[arg(required_unless_present = "list_rules")]
    input: Option<PathBuf>,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document type: resume or cover-letter
    #[arg(long, value_parser = parse_document_kind)]
    document_type: Option<DocumentKind>,

    /// Rule id to skip (repeatable)
    #[arg(long = "suppress", value_name = "RULE_ID")]
    suppress: Vec<String>,

    /// Write the full report here instead of stdout
    #[arg(long)]
    validation_report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Exit 1 on any finding, not just CRITICAL ones
    #[arg(long)]
    fail_on_warning: bool,

    /// Print the rule catalog and exit
    #[arg(long)]
    list_rules: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Reports go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<u8> {
    let config = load_config(args.config.as_deref(), args.document_type, |key| {
        std::env::var(key).ok()
    })?;
    let engine = AtsEngine::with_config(config).context("Failed to load rule catalog")?;

    if args.list_rules {
        print!("{}", render_rule_listing(engine.registry(), args.format)?);
        return Ok(EXIT_OK);
    }

    let Some(input) = args.input.as_ref() else {
        anyhow::bail!("No input document given");
    };
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    tracing::info!(file = %input.display(), "Validating");
    let request = ValidationRequest::new(filename, bytes).suppress_all(args.suppress.iter().cloned());
    let report = engine
        .validate(request)
        .with_context(|| format!("Validation of {} failed", input.display()))?;

    let rendered = args.format.renderer().render(&report)?;
    match &args.validation_report {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            print!("{}", ConsoleRenderer.render(&report)?);
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(exit_code(
        report.status(),
        report.findings().len(),
        args.fail_on_warning,
    ))
}
