//! Validation report and its renderings
//!
//! A `Report` is only ever assembled by the evaluator after aggregation, so
//! its status always agrees with its counts. Renderers are pure: the same
//! report always produces byte-identical output.

mod console;
mod json;
mod markdown;

pub use console::ConsoleRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

use crate::error::RenderError;
use ats_types::{Finding, SeverityCounts, Status};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Immutable outcome of one validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    document_id: String,
    filename: String,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: DateTime<Utc>,
    status: Status,
    counts_by_severity: SeverityCounts,
    findings: Vec<Finding>,
    recommendations: Vec<String>,
}

impl Report {
    pub(crate) fn assemble(
        document_id: String,
        filename: String,
        timestamp: DateTime<Utc>,
        status: Status,
        counts_by_severity: SeverityCounts,
        findings: Vec<Finding>,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            document_id,
            filename,
            timestamp,
            status,
            counts_by_severity,
            findings,
            recommendations,
        }
    }

    /// Hex SHA-256 of the normalized document text
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// RFC 3339 timestamp with second precision, e.g. `2024-05-01T12:00:00Z`
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn counts_by_severity(&self) -> &SeverityCounts {
        &self.counts_by_severity
    }

    /// Findings ordered by severity, then line
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}

fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Output format for a finished report
pub trait ReportRenderer {
    /// Short format name (`markdown`, `json`, `console`)
    fn name(&self) -> &'static str;

    fn render(&self, report: &Report) -> Result<String, RenderError>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use ats_types::{Category, Severity};
    use chrono::TimeZone;

    pub fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    pub fn report(status: Status, findings: Vec<Finding>) -> Report {
        let counts = SeverityCounts::tally(&findings);
        Report::assemble(
            "ab12".to_string(),
            "resume.md".to_string(),
            timestamp(),
            status,
            counts,
            findings,
            vec!["Use standard fonts (Arial, Calibri, Times New Roman)".to_string()],
        )
    }

    pub fn email_finding() -> Finding {
        Finding {
            rule_id: "contact-unlabeled-email".to_string(),
            category: Category::ContactFormatting,
            severity: Severity::High,
            line_number: 1,
            found_text: "user@example.com".to_string(),
            issue_text: "Email address 'user@example.com' has no label".to_string(),
            suggestion_text: "Prefix the address with a plain label: 'Email: user@example.com'"
                .to_string(),
            example: Some("Email: user@example.com".to_string()),
        }
    }
}
