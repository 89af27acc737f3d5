use super::{Report, ReportRenderer};
use crate::error::RenderError;
use ats_types::Severity;
use std::fmt::Write;

/// Persisted verification report
///
/// Section order is fixed: title and metadata, summary counts, one section
/// per graded severity (omitted when empty), recommendations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let mut out = String::new();

        writeln!(out, "# ATS Safety Verification Report")?;
        writeln!(out)?;
        writeln!(out, "## Document: {}", report.filename())?;
        writeln!(out, "**Verification Date:** {}", report.timestamp_rfc3339())?;
        writeln!(out, "**Overall Status:** {}", report.status())?;
        writeln!(out)?;

        writeln!(out, "## Summary")?;
        let counts = report.counts_by_severity();
        for severity in Severity::GRADED {
            writeln!(out, "- {}: {}", severity.summary_label(), counts.get(severity))?;
        }
        writeln!(out)?;

        for severity in Severity::GRADED {
            let mut findings = report
                .findings()
                .iter()
                .filter(|f| f.severity == severity)
                .peekable();
            if findings.peek().is_none() {
                continue;
            }
            writeln!(out, "## {}", severity.section_heading())?;
            writeln!(out)?;
            for finding in findings {
                writeln!(
                    out,
                    "### {} at line {}",
                    finding.category.display_name(),
                    finding.line_number
                )?;
                writeln!(out, "**Severity:** {}", finding.severity)?;
                writeln!(out, "**Found:** {}", finding.found_text)?;
                writeln!(out, "**Issue:** {}", finding.issue_text)?;
                writeln!(out, "**Suggestion:** {}", finding.suggestion_text)?;
                if let Some(example) = &finding.example {
                    writeln!(out, "**Example:** {example}")?;
                }
                writeln!(out)?;
            }
        }

        writeln!(out, "## Recommendations")?;
        for recommendation in report.recommendations() {
            writeln!(out, "- {recommendation}")?;
        }

        Ok(out)
    }
}
