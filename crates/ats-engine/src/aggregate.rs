//! Severity aggregation: ordering, counting, status and recommendations

use ats_types::{Category, Finding, SeverityCounts, Status};
use std::collections::BTreeSet;

/// General ATS guidance appended to every report
pub const GENERAL_TIPS: &[&str] = &[
    "Use standard fonts (Arial, Calibri, Times New Roman)",
    "Avoid tables, columns, and complex layouts",
    "Use standard section headers (Experience, Education, Skills)",
    "Include relevant keywords naturally",
    "Use standard date formats (Month YYYY - Month YYYY)",
    "Avoid emojis, special characters, and creative formatting",
];

/// Order findings by severity, then line. The sort is stable so findings on
/// the same line keep rule registration order.
pub fn order_findings(findings: &mut [Finding]) {
    findings.sort_by_key(|f| (f.severity, f.line_number));
}

/// Ordered decision table; the first matching row wins
pub fn decide_status(counts: &SeverityCounts) -> Status {
    if counts.critical > 0 {
        Status::Fail
    } else if counts.high > 0 {
        Status::Warning
    } else {
        Status::Pass
    }
}

/// Advisory notes first, then one tip per category with findings (in
/// category order), then the general tips
pub fn recommendations(advisories: Vec<String>, findings: &[Finding]) -> Vec<String> {
    let categories: BTreeSet<Category> = findings.iter().map(|f| f.category).collect();
    advisories
        .into_iter()
        .chain(categories.into_iter().map(|c| c.remediation().to_string()))
        .chain(GENERAL_TIPS.iter().map(|tip| tip.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_types::Severity;
    use pretty_assertions::assert_eq;

    fn finding(rule_id: &str, severity: Severity, line_number: usize, category: Category) -> Finding {
        Finding {
            rule_id: rule_id.to_string(),
            category,
            severity,
            line_number,
            found_text: String::new(),
            issue_text: String::new(),
            suggestion_text: String::new(),
            example: None,
        }
    }

    #[test]
    fn test_order_is_severity_then_line_then_registration() {
        let mut findings = vec![
            finding("a", Severity::Low, 1, Category::AllCaps),
            finding("b", Severity::Critical, 9, Category::UnicodeSymbols),
            finding("c", Severity::High, 4, Category::DateFormat),
            finding("d", Severity::High, 2, Category::TableUsage),
            finding("e", Severity::High, 4, Category::ContactFormatting),
        ];
        order_findings(&mut findings);
        let ids: Vec<&str> = findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "e", "a"]);
    }

    #[test]
    fn test_decision_table() {
        let mut counts = SeverityCounts::default();
        assert_eq!(decide_status(&counts), Status::Pass);
        counts.low = 5;
        counts.medium = 3;
        assert_eq!(decide_status(&counts), Status::Pass);
        counts.high = 7;
        assert_eq!(decide_status(&counts), Status::Warning);
        counts.critical = 1;
        assert_eq!(decide_status(&counts), Status::Fail);
    }

    #[test]
    fn test_recommendation_order() {
        let findings = vec![
            finding("x", Severity::High, 1, Category::TableUsage),
            finding("y", Severity::Critical, 1, Category::UnicodeSymbols),
            finding("z", Severity::High, 3, Category::TableUsage),
        ];
        let recs = recommendations(vec!["No email address found.".to_string()], &findings);
        assert_eq!(recs[0], "No email address found.");
        assert_eq!(recs[1], Category::UnicodeSymbols.remediation());
        assert_eq!(recs[2], Category::TableUsage.remediation());
        assert_eq!(&recs[3..], GENERAL_TIPS);
    }
}
