//! Property tests over generated documents

use ats_engine::{
    AtsEngine, Category, JsonRenderer, MarkdownRenderer, ReportRenderer, Severity, SeverityCounts,
    Status, ValidationRequest,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

/// Lines that trigger rules of every severity, mixed with clean ones
const FRAGMENTS: &[&str] = &[
    "# Jane Doe",
    "## Experience",
    "## My Journey",
    "### Senior Engineer",
    "Email: jane@example.com",
    "jane@example.com",
    "Phone: 555.123.4567",
    "LinkedIn: linkedin.com/in/jane",
    "Software Engineer at TechCorp (2020-2024)",
    "Started 03/21",
    "January 2020 - March 2024",
    "| Skill | Level |",
    "|-------|-------|",
    "Shipped the platform 🚀",
    "“Quoted” results — delivered",
    "PROFESSIONAL EXPERIENCE",
    "AWS, API, CEO",
    "I led my team",
    "Code Ninja at Acme",
    "<div style=\"column-count: 2\">",
    "~~COBOL~~ Rust",
    "Owned the PRD",
    "",
    "- Built payment services in Rust",
];

fn engine() -> AtsEngine {
    AtsEngine::new().unwrap()
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 1..30).prop_map(|lines| {
        let mut text = lines.join("\n");
        // Guarantee at least one non-blank line
        text.push_str("\nSummary line");
        text
    })
}

fn counts_from_markdown(markdown: &str) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for line in markdown.lines() {
        let Some(label) = line.strip_prefix("**Severity:** ") else {
            continue;
        };
        let severity = match label {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => continue,
        };
        counts.increment(severity);
    }
    counts
}

proptest! {
    /// Same input and timestamp render byte-identically
    #[test]
    fn rendering_is_idempotent(text in document()) {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let engine = engine();
        let first = engine.validate(ValidationRequest::from_text("r.md", &text).at(at)).unwrap();
        let second = engine.validate(ValidationRequest::from_text("r.md", &text).at(at)).unwrap();
        prop_assert_eq!(
            MarkdownRenderer.render(&first).unwrap(),
            MarkdownRenderer.render(&second).unwrap()
        );
        prop_assert_eq!(
            JsonRenderer.render(&first).unwrap(),
            JsonRenderer.render(&second).unwrap()
        );
    }

    /// Findings are sorted by severity then line, and every line exists
    #[test]
    fn findings_are_ordered_and_in_range(text in document()) {
        let report = engine().validate_text("r.md", &text).unwrap();
        let line_count = text.lines().count();
        for pair in report.findings().windows(2) {
            prop_assert!((pair[0].severity, pair[0].line_number) <= (pair[1].severity, pair[1].line_number));
        }
        for finding in report.findings() {
            prop_assert!(finding.line_number >= 1 && finding.line_number <= line_count);
            prop_assert!(finding.severity.is_graded());
        }
    }

    /// Counts agree with findings, status follows the decision table, and
    /// counts re-derived from the Markdown rendering match
    #[test]
    fn counts_round_trip_through_markdown(text in document()) {
        let report = engine().validate_text("r.md", &text).unwrap();
        let counts = *report.counts_by_severity();
        prop_assert_eq!(counts, SeverityCounts::tally(report.findings()));
        prop_assert_eq!(counts.total(), report.findings().len());

        let expected = if counts.critical > 0 {
            Status::Fail
        } else if counts.high > 0 {
            Status::Warning
        } else {
            Status::Pass
        };
        prop_assert_eq!(report.status(), expected);

        let markdown = MarkdownRenderer.render(&report).unwrap();
        prop_assert_eq!(counts_from_markdown(&markdown), counts);
    }

    /// Any ordering of allow-listed acronyms is accepted
    #[test]
    fn allow_listed_acronyms_never_flagged(
        words in prop::collection::vec(prop::sample::select(&["AWS", "API", "CEO", "SQL", "REST"][..]), 1..6)
    ) {
        let report = engine().validate_text("r.md", &words.join(", ")).unwrap();
        prop_assert!(report.findings().iter().all(|f| f.category != Category::AllCaps));
    }

    /// Arbitrary text never panics; it either validates or is rejected as input
    #[test]
    fn arbitrary_text_never_panics(text in "\\PC*") {
        let _ = engine().validate_text("r.md", &text);
    }
}
