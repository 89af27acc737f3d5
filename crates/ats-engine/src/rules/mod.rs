//! Rule model and detection rule families
//!
//! Each family module exposes pure matcher functions plus a `rules()` list
//! describing how its matchers are registered (id, category, severity,
//! templates, exceptions). The registry concatenates these lists in a fixed
//! order.

pub mod characters;
pub mod contact;
pub mod dates;
pub mod keywords;
pub mod language;
pub mod layout;
pub mod structure;
pub mod style;

use crate::config::EngineConfig;
use crate::document::Document;
use crate::error::MatchError;
use ats_types::{Category, DocumentKind, Finding, Severity};

/// Raw match produced by a matcher, before templates are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHit {
    /// 1-indexed line number
    pub line_number: usize,
    pub matched_text: String,
    /// Extra detail substituted into `{context}` in templates
    pub context: String,
    /// Corrected form of the line, when one can be derived
    pub corrected: Option<String>,
}

impl RawHit {
    pub fn new(line_number: usize, matched_text: impl Into<String>) -> Self {
        Self {
            line_number,
            matched_text: matched_text.into(),
            context: String::new(),
            corrected: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_corrected(mut self, corrected: impl Into<String>) -> Self {
        self.corrected = Some(corrected.into());
        self
    }
}

/// Read-only inputs available to a matcher besides the document
pub struct RuleContext<'a> {
    pub config: &'a EngineConfig,
    pub exceptions: &'static [&'static str],
}

impl RuleContext<'_> {
    /// Whether `token` is on the rule's allow-list (case-insensitive)
    pub fn is_exempt(&self, token: &str) -> bool {
        self.exceptions
            .iter()
            .any(|exempt| exempt.eq_ignore_ascii_case(token))
    }
}

/// Pure detection function: never mutates the document
pub type Matcher = fn(&Document, &RuleContext<'_>) -> Result<Vec<RawHit>, MatchError>;

/// Which documents a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleScope {
    All,
    ResumeOnly,
}

impl RuleScope {
    pub fn applies_to(&self, kind: DocumentKind) -> bool {
        match self {
            RuleScope::All => true,
            RuleScope::ResumeOnly => kind == DocumentKind::Resume,
        }
    }
}

/// A statically configured detector
///
/// Templates understand two placeholders: `{text}` (the matched text) and
/// `{context}` (matcher-provided detail).
#[derive(Clone)]
pub struct Rule {
    pub id: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub scope: RuleScope,
    pub matcher: Matcher,
    pub message_template: &'static str,
    pub suggestion_template: &'static str,
    pub exceptions: &'static [&'static str],
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Run the matcher against a document
    pub fn matches(
        &self,
        document: &Document,
        config: &EngineConfig,
    ) -> Result<Vec<RawHit>, MatchError> {
        let context = RuleContext {
            config,
            exceptions: self.exceptions,
        };
        (self.matcher)(document, &context)
    }

    /// Turn a raw hit into a finding carrying this rule's severity
    pub fn finding(&self, hit: RawHit) -> Finding {
        Finding {
            rule_id: self.id.to_string(),
            category: self.category,
            severity: self.severity,
            line_number: hit.line_number,
            issue_text: render_template(self.message_template, &hit),
            suggestion_text: render_template(self.suggestion_template, &hit),
            found_text: hit.matched_text,
            example: hit.corrected,
        }
    }
}

fn render_template(template: &str, hit: &RawHit) -> String {
    template
        .replace("{text}", &hit.matched_text)
        .replace("{context}", &hit.context)
}

/// Replace the byte span `start..end` of `line` with `replacement`
pub(crate) fn splice(line: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(line.len() + replacement.len());
    out.push_str(&line[..start]);
    out.push_str(replacement);
    out.push_str(&line[end..]);
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Parse `text` and run a single rule's matcher with default config
    pub fn hits(rule: &Rule, text: &str) -> Vec<RawHit> {
        hits_with(rule, text, &EngineConfig::default())
    }

    pub fn hits_with(rule: &Rule, text: &str, config: &EngineConfig) -> Vec<RawHit> {
        let document = Document::parse("test.md", text).unwrap();
        rule.matches(&document, config).unwrap()
    }

    /// Find a rule by id across all families
    pub fn rule(id: &str) -> Rule {
        crate::registry::builtin_rules()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap_or_else(|| panic!("no rule {id}"))
    }

    pub fn lines(hits: &[RawHit]) -> Vec<usize> {
        hits.iter().map(|h| h.line_number).collect()
    }
}
