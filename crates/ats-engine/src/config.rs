//! Engine configuration
//!
//! Thresholds and switches that tune rule behavior without changing the rule
//! catalog. Loaded from JSON, environment variables, or built in code.

use crate::error::ConfigError;
use ats_types::DocumentKind;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Tunable settings shared by every rule during a run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Resume or cover letter; resume-only rules are skipped for letters
    pub document_kind: DocumentKind,
    /// Rule ids that never produce findings
    pub suppressed_rules: BTreeSet<String>,
    /// How many characters before a contact token are searched for a label
    pub label_window: usize,
    /// Longest run of blank lines that is still accepted
    pub max_blank_lines: usize,
    /// Lines between an image and contact details that count as "near"
    pub image_proximity_lines: usize,
    /// Minimum repetitions before a term is considered stuffed
    pub stuffing_min_occurrences: usize,
    /// Minimum share of all words before a term is considered stuffed
    pub stuffing_min_density: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            document_kind: DocumentKind::Resume,
            suppressed_rules: BTreeSet::new(),
            label_window: 30,
            max_blank_lines: 2,
            image_proximity_lines: 3,
            stuffing_min_occurrences: 10,
            stuffing_min_density: 0.05,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load defaults overridden by environment variables
    ///
    /// - `ATS_DOCUMENT_KIND`: `resume` or `cover-letter`
    /// - `ATS_SUPPRESS_RULES`: comma-separated rule ids
    /// - `ATS_LABEL_WINDOW`: characters searched for a contact label
    /// - `ATS_MAX_BLANK_LINES`: accepted run of blank lines
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (environment-style keys)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup("ATS_DOCUMENT_KIND") {
            self.document_kind =
                DocumentKind::parse(&kind).ok_or_else(|| ConfigError::InvalidValue {
                    key: "ATS_DOCUMENT_KIND".to_string(),
                    value: kind.clone(),
                })?;
        }
        if let Some(rules) = lookup("ATS_SUPPRESS_RULES") {
            self.suppressed_rules.extend(
                rules
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
            );
        }
        if let Some(window) = lookup("ATS_LABEL_WINDOW") {
            self.label_window = parse_number("ATS_LABEL_WINDOW", &window)?;
        }
        if let Some(max) = lookup("ATS_MAX_BLANK_LINES") {
            self.max_blank_lines = parse_number("ATS_MAX_BLANK_LINES", &max)?;
        }
        Ok(self)
    }

    pub fn with_document_kind(mut self, kind: DocumentKind) -> Self {
        self.document_kind = kind;
        self
    }

    pub fn suppress(mut self, rule_id: impl Into<String>) -> Self {
        self.suppressed_rules.insert(rule_id.into());
        self
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
