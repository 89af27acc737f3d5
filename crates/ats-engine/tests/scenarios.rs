//! End-to-end validation scenarios

use ats_engine::document::Document;
use ats_engine::patterns::Pattern;
use ats_engine::registry::builtin_rules;
use ats_engine::{
    AtsEngine, CancelFlag, Category, DocumentKind, EngineConfig, InputError, MarkdownRenderer,
    MatchError, RawHit, Registry, ReportRenderer, Rule, RuleContext, RuleScope, Severity, Status,
    ValidationError, ValidationRequest,
};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;

const COMPLIANT_RESUME: &str = "\
# Jane Doe

Email: jane.doe@example.com
Phone: (555) 123-4567
LinkedIn: https://linkedin.com/in/janedoe
Location: Austin, Texas

## Summary

Backend engineer with eight years of experience building reliable payment systems.

## Experience

### Senior Software Engineer, Acme Payments

January 2020 - March 2024

- Led migration of the billing platform to AWS, cutting costs by 30 percent.
- Designed a REST API used by forty internal teams.

## Education

### Bachelor of Science in Computer Science, State University

September 2012 - May 2016

## Skills

- Rust, Go, Python, SQL
- Docker, Kubernetes, Terraform
";

fn engine() -> AtsEngine {
    AtsEngine::new().unwrap()
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_unlabeled_email_warns() {
    let report = engine().validate_text("resume.md", "user@example.com").unwrap();
    assert_eq!(report.status(), Status::Warning);
    assert_eq!(report.findings().len(), 1);
    let finding = &report.findings()[0];
    assert_eq!(finding.severity, Severity::High);
    assert_eq!(finding.category, Category::ContactFormatting);
    assert_eq!(finding.line_number, 1);
}

#[test]
fn test_markdown_table_rows_each_reported() {
    let table = "| Skill | Level |\n|-------|-------|\n| Rust | Expert |\n| Go | Advanced |\n| Python | Expert |";
    let report = engine().validate_text("resume.md", table).unwrap();
    assert_eq!(report.status(), Status::Warning);
    assert_eq!(report.counts_by_severity().high, 5);
    assert!(report
        .findings()
        .iter()
        .all(|f| f.category == Category::TableUsage && f.severity == Severity::High));
    let lines: Vec<usize> = report.findings().iter().map(|f| f.line_number).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_year_only_dates_suggest_month_year() {
    let report = engine()
        .validate_text("resume.md", "Software Engineer at TechCorp (2020-2024)")
        .unwrap();
    assert_eq!(report.status(), Status::Warning);
    assert_eq!(report.findings().len(), 1);
    let finding = &report.findings()[0];
    assert_eq!(finding.category, Category::DateFormat);
    assert!(finding.suggestion_text.contains("January 2020 - March 2024"));
}

#[test]
fn test_emoji_fails() {
    let report = engine().validate_text("resume.md", "🚀").unwrap();
    assert_eq!(report.status(), Status::Fail);
    assert_eq!(report.counts_by_severity().critical, 1);
    assert_eq!(report.findings().len(), 1);
}

#[test]
fn test_compliant_resume_passes() {
    let report = engine().validate_text("resume.md", COMPLIANT_RESUME).unwrap();
    assert_eq!(report.findings(), &[]);
    assert_eq!(report.status(), Status::Pass);
    assert_eq!(report.counts_by_severity().total(), 0);
}

#[test]
fn test_allow_listed_acronyms_are_not_all_caps() {
    let report = engine().validate_text("resume.md", "AWS, API, CEO").unwrap();
    assert!(report
        .findings()
        .iter()
        .all(|f| f.category != Category::AllCaps));
}

#[test]
fn test_high_findings_never_fail() {
    let text = "user@example.com\nother@example.com\n555-123-4567\n(2018-2020)\n(2020-2024)";
    let report = engine().validate_text("resume.md", text).unwrap();
    assert!(report.counts_by_severity().high >= 5);
    assert_eq!(report.status(), Status::Warning);
}

#[test]
fn test_findings_ordered_by_severity_then_line() {
    let text = "user@example.com\n\n\n\n\nLaunched 🚀\nResults — delivered";
    let report = engine().validate_text("resume.md", text).unwrap();
    let order: Vec<(Severity, usize)> = report
        .findings()
        .iter()
        .map(|f| (f.severity, f.line_number))
        .collect();
    assert_eq!(
        order,
        vec![
            (Severity::Critical, 6),
            (Severity::High, 1),
            (Severity::Medium, 7),
            (Severity::Low, 2),
        ]
    );
}

#[test]
fn test_empty_input_is_rejected() {
    let err = engine().validate_text("empty.md", "   \n").unwrap_err();
    assert_eq!(err, ValidationError::Input(InputError::Empty));
}

#[test]
fn test_binary_input_is_rejected() {
    let request = ValidationRequest::new("photo.jpg", vec![0xff, 0xd8, 0xff, 0xe0]);
    let err = engine().validate(request).unwrap_err();
    assert!(matches!(err, ValidationError::Input(InputError::NotText { offset: 0 })));
}

#[test]
fn test_unknown_suppressed_rule_is_rejected() {
    let request = ValidationRequest::from_text("resume.md", "text").suppress("emoji");
    let err = engine().validate(request).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Input(InputError::UnknownRule("emoji".to_string()))
    );
}

static BROKEN: Pattern = Pattern::new(r"(unclosed");

fn broken_matcher(_: &Document, _: &RuleContext<'_>) -> Result<Vec<RawHit>, MatchError> {
    BROKEN.regex()?;
    Ok(Vec::new())
}

#[test]
fn test_broken_pattern_is_internal_error() {
    let mut rules = builtin_rules();
    rules.push(Rule {
        id: "broken-pattern",
        category: Category::KeywordHygiene,
        severity: Severity::Low,
        scope: RuleScope::All,
        matcher: broken_matcher,
        message_template: "{text}",
        suggestion_template: "{text}",
        exceptions: &[],
    });
    let registry = Registry::from_rules(rules).unwrap();
    let engine = AtsEngine::with_registry(EngineConfig::default(), registry);
    let err = engine.validate_text("resume.md", "Launched 🚀").unwrap_err();
    match err {
        ValidationError::Internal { rule_id, source } => {
            assert_eq!(rule_id, "broken-pattern");
            assert!(matches!(source, MatchError::Pattern { .. }));
        }
        other => panic!("expected internal error, got {other:?}"),
    }
}

#[test]
fn test_cancelled_run_produces_no_report() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let request =
        ValidationRequest::from_text("resume.md", COMPLIANT_RESUME).with_cancel_flag(cancel);
    let err = engine().validate(request).unwrap_err();
    assert!(matches!(err, ValidationError::Cancelled(_)));
}

#[test]
fn test_cover_letter_skips_resume_only_rules() {
    let text = "## Dear Hiring Manager\n\nI am excited to apply. My background fits your team.";
    let resume = engine().validate_text("letter.md", text).unwrap();
    assert!(resume
        .findings()
        .iter()
        .any(|f| f.rule_id == "first-person-pronoun"));

    let config = EngineConfig::default().with_document_kind(DocumentKind::CoverLetter);
    let letter = AtsEngine::with_config(config)
        .unwrap()
        .validate_text("letter.md", text)
        .unwrap();
    assert!(letter.findings().iter().all(|f| {
        f.rule_id != "first-person-pronoun" && f.rule_id != "section-header-nonstandard"
    }));
    assert!(letter
        .recommendations()
        .iter()
        .all(|r| !r.starts_with("No Experience section")));
}

#[test]
fn test_markdown_report_golden() {
    let request =
        ValidationRequest::from_text("resume.md", "Software Engineer at TechCorp (2020-2024)")
            .at(fixed_time());
    let report = engine().validate(request).unwrap();
    let rendered = MarkdownRenderer.render(&report).unwrap();
    let expected = "\
# ATS Safety Verification Report

## Document: resume.md
**Verification Date:** 2024-05-01T12:00:00Z
**Overall Status:** WARNING

## Summary
- Critical Issues: 0
- High Severity Issues: 1
- Medium Severity Issues: 0
- Low Severity Issues: 0

## High Severity Issues (Should Fix)

### Date Format at line 1
**Severity:** HIGH
**Found:** 2020-2024
**Issue:** Year-only date range '2020-2024' hides employment length
**Suggestion:** Use full month and year, e.g. January 2020 - March 2024
**Example:** Software Engineer at TechCorp (January 2020 - March 2024)

## Recommendations
- No email address found. Add a labeled address near the top, e.g. Email: name@example.com.
- Write every date as Month YYYY - Month YYYY
- Use standard fonts (Arial, Calibri, Times New Roman)
- Avoid tables, columns, and complex layouts
- Use standard section headers (Experience, Education, Skills)
- Include relevant keywords naturally
- Use standard date formats (Month YYYY - Month YYYY)
- Avoid emojis, special characters, and creative formatting
";
    assert_eq!(rendered, expected);
}

#[test]
fn test_same_input_renders_identically() {
    let request = || ValidationRequest::from_text("resume.md", COMPLIANT_RESUME).at(fixed_time());
    let first = engine().validate(request()).unwrap();
    let second = engine().validate(request()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        MarkdownRenderer.render(&first).unwrap(),
        MarkdownRenderer.render(&second).unwrap()
    );
}
