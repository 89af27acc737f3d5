use super::{Report, ReportRenderer};
use crate::error::RenderError;
use ats_types::Severity;
use std::fmt::Write;

/// Short terminal summary: counts, one line per finding, then the status
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer;

impl ReportRenderer for ConsoleRenderer {
    fn name(&self) -> &'static str {
        "console"
    }

    fn render(&self, report: &Report) -> Result<String, RenderError> {
        let mut out = String::new();
        writeln!(out, "ATS validation: {}", report.filename())?;
        let counts = report.counts_by_severity();
        for severity in Severity::GRADED {
            writeln!(out, "  - {}: {}", severity.summary_label(), counts.get(severity))?;
        }
        for finding in report.findings() {
            writeln!(
                out,
                "  [{}] line {}: {} ({})",
                finding.severity, finding.line_number, finding.issue_text, finding.rule_id
            )?;
        }
        writeln!(out, "Status: {}", report.status())?;
        Ok(out)
    }
}
