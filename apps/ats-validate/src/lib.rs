//! Command-line support for the ATS validator
//!
//! Config loading, renderer selection and exit-code mapping live here so the
//! binary stays a thin shell around them.

use anyhow::{Context, Result};
use ats_engine::{
    EngineConfig, JsonRenderer, MarkdownRenderer, Registry, ReportRenderer, RuleInfo, RuleScope,
};
use ats_types::{DocumentKind, Status};
use std::fmt::Write;
use std::path::Path;

/// Validation passed, or passed with warnings
pub const EXIT_OK: u8 = 0;
/// At least one CRITICAL finding (or any finding under `--fail-on-warning`)
pub const EXIT_FAILED: u8 = 1;
/// The run itself failed: bad input, bad config, internal error
pub const EXIT_ERROR: u8 = 2;

/// Report file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            OutputFormat::Markdown => Box::new(MarkdownRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Map a finished run to a process exit code
///
/// With `fail_on_warning` any finding fails the run, whatever its severity.
pub fn exit_code(status: Status, findings: usize, fail_on_warning: bool) -> u8 {
    match status {
        Status::Fail => EXIT_FAILED,
        _ if fail_on_warning && findings > 0 => EXIT_FAILED,
        Status::Pass | Status::Warning => EXIT_OK,
    }
}

/// Parse a `--document-type` value
pub fn parse_document_kind(value: &str) -> Result<DocumentKind, String> {
    DocumentKind::parse(value)
        .ok_or_else(|| format!("unknown document type '{value}' (expected resume or cover-letter)"))
}

/// Build the engine config: JSON file (if any), then environment overrides,
/// then the explicit document type
pub fn load_config<F>(
    path: Option<&Path>,
    document_kind: Option<DocumentKind>,
    lookup: F,
) -> Result<EngineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            EngineConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    let mut config = base
        .with_overrides(lookup)
        .context("Invalid ATS_* environment override")?;
    if let Some(kind) = document_kind {
        config = config.with_document_kind(kind);
    }
    Ok(config)
}

/// Rule catalog listing, one rule per line
pub fn render_rule_listing(registry: &Registry, format: OutputFormat) -> Result<String> {
    let listing = registry.listing();
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&listing)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Markdown => Ok(listing_table(&listing)?),
    }
}

fn listing_table(listing: &[RuleInfo]) -> Result<String, std::fmt::Error> {
    let width = listing.iter().map(|info| info.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for info in listing {
        let scope = match info.scope {
            RuleScope::All => "all",
            RuleScope::ResumeOnly => "resume-only",
        };
        writeln!(
            out,
            "{:<width$}  {:<8}  {:<11}  {}",
            info.id,
            info.severity.as_str(),
            scope,
            info.category.slug()
        )?;
    }
    Ok(out)
}
