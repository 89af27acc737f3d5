//! ATS compatibility validation engine
//!
//! Validates a Markdown or plain-text resume (or cover letter) against a
//! catalog of Applicant Tracking System parsing rules and produces a graded
//! report with per-line findings, a PASS/WARNING/FAIL status and
//! recommendations.
//!
//! ```no_run
//! use ats_engine::{AtsEngine, MarkdownRenderer, ReportRenderer, ValidationRequest};
//!
//! let engine = AtsEngine::new()?;
//! let report = engine.validate(ValidationRequest::from_text("resume.md", "# Jane Doe"))?;
//! println!("{}", MarkdownRenderer.render(&report)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod patterns;
pub mod registry;
pub mod report;
pub mod rules;

pub use ats_types::{Category, DocumentKind, Finding, Severity, SeverityCounts, Status};
pub use config::EngineConfig;
pub use document::Document;
pub use error::{ConfigError, InputError, MatchError, RegistryError, RenderError, ValidationError};
pub use evaluator::{CancelFlag, Evaluation};
pub use registry::{Registry, RuleInfo};
pub use report::{ConsoleRenderer, JsonRenderer, MarkdownRenderer, Report, ReportRenderer};
pub use rules::{RawHit, Rule, RuleContext, RuleScope};

use chrono::{DateTime, SubsecRound, Utc};
use std::borrow::Cow;
use tracing::instrument;

/// Input for a single validation run
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    filename: String,
    bytes: Vec<u8>,
    suppressed: Vec<String>,
    timestamp: Option<DateTime<Utc>>,
    cancel: CancelFlag,
}

impl ValidationRequest {
    /// Validate raw bytes; they must decode as UTF-8
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            suppressed: Vec::new(),
            timestamp: None,
            cancel: CancelFlag::default(),
        }
    }

    pub fn from_text(filename: impl Into<String>, text: &str) -> Self {
        Self::new(filename, text.as_bytes())
    }

    /// Skip a rule for this run only
    pub fn suppress(mut self, rule_id: impl Into<String>) -> Self {
        self.suppressed.push(rule_id.into());
        self
    }

    pub fn suppress_all<I, S>(mut self, rule_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suppressed.extend(rule_ids.into_iter().map(Into::into));
        self
    }

    /// Fix the report timestamp instead of reading the clock
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Observe `cancel` between rule applications
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Validation engine entry point
#[derive(Debug, Clone)]
pub struct AtsEngine {
    config: EngineConfig,
    registry: Cow<'static, Registry>,
}

impl AtsEngine {
    /// Engine with the built-in rule catalog and default settings
    pub fn new() -> Result<Self, ValidationError> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            config,
            registry: Cow::Borrowed(Registry::builtin()?),
        })
    }

    /// Engine over a custom rule catalog
    pub fn with_registry(config: EngineConfig, registry: Registry) -> Self {
        Self {
            config,
            registry: Cow::Owned(registry),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run every applicable rule over the document and build the report
    #[instrument(skip_all, fields(filename = %request.filename))]
    pub fn validate(&self, request: ValidationRequest) -> Result<Report, ValidationError> {
        let document = Document::from_bytes(&request.filename, &request.bytes)?;
        let timestamp = request
            .timestamp
            .unwrap_or_else(Utc::now)
            .trunc_subsecs(0);

        let report = Evaluation::init(&self.registry, &self.config, document, &request.suppressed)?
            .evaluate(&request.cancel)?
            .aggregate()
            .finish(timestamp);
        Ok(report)
    }

    /// Validate text directly with no per-request options
    pub fn validate_text(&self, filename: &str, text: &str) -> Result<Report, ValidationError> {
        self.validate(ValidationRequest::from_text(filename, text))
    }
}
