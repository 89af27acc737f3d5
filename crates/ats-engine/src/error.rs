//! Error types for validation runs
//!
//! Findings are never errors. These types only cover inputs the engine cannot
//! evaluate and defects inside the rule catalog itself.

use thiserror::Error;

/// Input could not be turned into a document or request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Document is empty")]
    Empty,

    #[error("Document is not valid UTF-8 text (invalid byte at offset {offset})")]
    NotText { offset: usize },

    #[error("Unknown rule id in suppression list: {0}")]
    UnknownRule(String),
}

/// A matcher could not run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Rule catalog could not be assembled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),
}

/// Configuration could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// A report could not be rendered
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a validation run. No partial report is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Internal error in rule '{rule_id}': {source}")]
    Internal {
        rule_id: String,
        #[source]
        source: MatchError,
    },

    #[error("Validation cancelled before rule '{0}'")]
    Cancelled(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
