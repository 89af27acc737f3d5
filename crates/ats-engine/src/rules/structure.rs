//! Section naming, header hierarchy and document-level completeness checks

use super::{RawHit, Rule, RuleContext, RuleScope};
use crate::document::{ContactKind, Document, Header};
use crate::error::MatchError;
use ats_types::{Category, Severity};
use std::collections::HashSet;

/// Canonical section names and the synonyms parsers map onto them
pub const STANDARD_SECTIONS: &[(&str, &[&str])] = &[
    (
        "Summary",
        &[
            "summary",
            "professional summary",
            "career summary",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about",
            "about me",
            "overview",
        ],
    ),
    (
        "Experience",
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    ("Education", &["education", "academic background", "academics"]),
    (
        "Skills",
        &[
            "skills",
            "technical skills",
            "key skills",
            "core competencies",
            "competencies",
            "technologies",
        ],
    ),
    (
        "Certifications",
        &["certifications", "certificates", "licenses", "licenses and certifications"],
    ),
    ("Projects", &["projects", "personal projects", "key projects"]),
    ("Publications", &["publications"]),
    ("Awards", &["awards", "honors", "honors and awards", "achievements"]),
    (
        "Volunteer",
        &["volunteer", "volunteering", "volunteer experience", "community involvement"],
    ),
    ("Languages", &["languages"]),
    ("Contact", &["contact", "contact information", "contact info"]),
    ("References", &["references"]),
    ("Interests", &["interests"]),
    ("Training", &["training", "professional development"]),
    (
        "Affiliations",
        &["affiliations", "professional affiliations", "memberships"],
    ),
];

/// Sections every resume is expected to carry
pub const CORE_SECTIONS: &[&str] = &["Experience", "Education", "Skills"];

/// Words that hint at the standard section a creative header stands for
const SECTION_HINTS: &[(&str, &str)] = &[
    ("journey", "Experience"),
    ("career", "Experience"),
    ("work", "Experience"),
    ("job", "Experience"),
    ("employ", "Experience"),
    ("school", "Education"),
    ("academic", "Education"),
    ("degree", "Education"),
    ("stud", "Education"),
    ("skill", "Skills"),
    ("tool", "Skills"),
    ("tech", "Skills"),
    ("stack", "Skills"),
    ("expertise", "Skills"),
    ("who i am", "Summary"),
    ("bio", "Summary"),
    ("story", "Summary"),
    ("project", "Projects"),
    ("built", "Projects"),
    ("award", "Awards"),
    ("honor", "Awards"),
    ("cert", "Certifications"),
    ("reach", "Contact"),
    ("touch", "Contact"),
];

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "section-header-nonstandard",
            category: Category::SectionHeaders,
            severity: Severity::Low,
            scope: RuleScope::ResumeOnly,
            matcher: find_nonstandard_sections,
            message_template: "Section header '{text}' is not a standard name",
            suggestion_template: "Rename the section to {context}",
            exceptions: &[],
        },
        Rule {
            id: "header-hierarchy",
            category: Category::HeaderHierarchy,
            severity: Severity::Medium,
            scope: RuleScope::All,
            matcher: find_hierarchy_problems,
            message_template: "{context}: '{text}'",
            suggestion_template: "Use one H1 for your name, H2 for sections and H3 for entries",
            exceptions: &[],
        },
        Rule {
            id: "missing-core-section",
            category: Category::DocumentStructure,
            severity: Severity::Advisory,
            scope: RuleScope::ResumeOnly,
            matcher: find_missing_core_sections,
            message_template: "No {text} section found.",
            suggestion_template: "Add a section titled '{text}' so parsers can locate it.",
            exceptions: &[],
        },
        Rule {
            id: "missing-email",
            category: Category::DocumentStructure,
            severity: Severity::Advisory,
            scope: RuleScope::All,
            matcher: find_missing_email,
            message_template: "No email address found.",
            suggestion_template: "Add a labeled address near the top, e.g. {context}.",
            exceptions: &[],
        },
    ]
}

/// Canonical name for a section header, accepting synonyms and combined
/// headers such as `Education & Certifications`
pub fn canonical_section(header: &str) -> Option<&'static str> {
    let normalized = normalize(header);
    if let Some(name) = lookup(&normalized) {
        return Some(name);
    }
    let parts: Vec<&str> = normalized
        .split(['&', '/', ','])
        .flat_map(|part| part.split(" and "))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }
    let names: Vec<&'static str> = parts.iter().map(|p| lookup(p)).collect::<Option<_>>()?;
    names.first().copied()
}

fn lookup(normalized: &str) -> Option<&'static str> {
    STANDARD_SECTIONS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&normalized))
        .map(|(name, _)| *name)
}

fn normalize(header: &str) -> String {
    header
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn suggest_section(header: &str) -> Option<&'static str> {
    let normalized = normalize(header);
    SECTION_HINTS
        .iter()
        .find(|(hint, _)| normalized.contains(hint))
        .map(|(_, name)| *name)
}

pub fn find_nonstandard_sections(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(document
        .headers()
        .iter()
        .filter(|h| h.level == 2 && canonical_section(&h.text).is_none())
        .map(|h| {
            let hit = RawHit::new(h.line_number, h.text.as_str());
            match suggest_section(&h.text) {
                Some(name) => hit
                    .with_context(format!("'{name}'"))
                    .with_corrected(format!("## {name}")),
                None => hit.with_context("a standard name such as Experience, Education or Skills"),
            }
        })
        .collect())
}

/// Skipped levels, repeated H1 headers and duplicated H2 sections
pub fn find_hierarchy_problems(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let mut hits = Vec::new();
    let mut previous: Option<&Header> = None;
    let mut seen_title = false;
    let mut sections = HashSet::new();

    for header in document.headers() {
        match previous {
            Some(prev) if header.level > prev.level + 1 => {
                let fixed = prev.level + 1;
                hits.push(
                    RawHit::new(header.line_number, header.text.as_str())
                        .with_context(format!(
                            "Header skips from H{} to H{}",
                            prev.level, header.level
                        ))
                        .with_corrected(format!("{} {}", "#".repeat(fixed), header.text)),
                );
            }
            // The name line may stand in for H1, so a document may open at H2
            None if header.level > 2 => hits.push(
                RawHit::new(header.line_number, header.text.as_str())
                    .with_context(format!("Document starts at H{}", header.level))
                    .with_corrected(format!("## {}", header.text)),
            ),
            _ => {}
        }
        match header.level {
            1 if seen_title => hits.push(
                RawHit::new(header.line_number, header.text.as_str())
                    .with_context("More than one top-level header")
                    .with_corrected(format!("## {}", header.text)),
            ),
            1 => seen_title = true,
            2 if !sections.insert(normalize(&header.text)) => hits.push(
                RawHit::new(header.line_number, header.text.as_str())
                    .with_context("Section appears more than once"),
            ),
            _ => {}
        }
        previous = Some(header);
    }
    Ok(hits)
}

/// Only applies once the document uses H2 sections at all
pub fn find_missing_core_sections(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    if document.first_section_line().is_none() {
        return Ok(Vec::new());
    }
    let present: HashSet<&str> = document
        .headers()
        .iter()
        .filter(|h| h.level == 2)
        .flat_map(|h| {
            let normalized = normalize(&h.text);
            normalized
                .split(['&', '/', ','])
                .flat_map(|part| part.split(" and "))
                .filter_map(|part| lookup(part.trim()))
                .collect::<Vec<_>>()
        })
        .collect();

    Ok(CORE_SECTIONS
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| RawHit::new(1, *name))
        .collect())
}

pub fn find_missing_email(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    if document.contacts_of(ContactKind::Email).next().is_some() {
        return Ok(Vec::new());
    }
    Ok(vec![RawHit::new(1, "").with_context("Email: name@example.com")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{hits, lines, rule};

    #[test]
    fn test_canonical_sections() {
        assert_eq!(canonical_section("Work Experience"), Some("Experience"));
        assert_eq!(canonical_section("  Technical Skills: "), Some("Skills"));
        assert_eq!(canonical_section("Education & Certifications"), Some("Education"));
        assert_eq!(canonical_section("My Journey"), None);
        assert_eq!(canonical_section("Skills & Vibes"), None);
    }

    #[test]
    fn test_nonstandard_section_headers() {
        let found = hits(
            &rule("section-header-nonstandard"),
            "# Jane\n## My Journey\n## Education\n## Things I Like\n### Not a section",
        );
        assert_eq!(lines(&found), vec![2, 4]);
        assert_eq!(found[0].corrected.as_deref(), Some("## Experience"));
        assert_eq!(found[1].corrected, None);
    }

    #[test]
    fn test_header_hierarchy() {
        let found = hits(
            &rule("header-hierarchy"),
            "# Jane\n### Engineer\n## Skills\n## skills\n# Again",
        );
        assert_eq!(lines(&found), vec![2, 4, 5]);
        assert_eq!(found[0].context, "Header skips from H1 to H3");
        assert_eq!(found[0].corrected.as_deref(), Some("## Engineer"));
        assert_eq!(found[1].context, "Section appears more than once");
        assert_eq!(found[2].context, "More than one top-level header");
    }

    #[test]
    fn test_first_header_below_h2_is_flagged() {
        let found = hits(&rule("header-hierarchy"), "Jane Doe\n### Engineer\n#### Acme");
        assert_eq!(lines(&found), vec![2]);
        assert_eq!(found[0].context, "Document starts at H3");
        assert_eq!(found[0].corrected.as_deref(), Some("## Engineer"));

        assert!(hits(&rule("header-hierarchy"), "## Experience\n### Engineer").is_empty());
    }

    #[test]
    fn test_well_formed_hierarchy_passes() {
        let text = "# Jane\n## Experience\n### Engineer\n## Education\n### BSc\n## Skills";
        assert!(hits(&rule("header-hierarchy"), text).is_empty());
    }

    #[test]
    fn test_missing_core_sections() {
        let found = hits(
            &rule("missing-core-section"),
            "# Jane\n## Work History\n## Tech Stack",
        );
        let names: Vec<&str> = found.iter().map(|h| h.matched_text.as_str()).collect();
        assert_eq!(names, vec!["Education", "Skills"]);
        assert_eq!(lines(&found), vec![1, 1]);

        // Documents without sections are not judged
        assert!(hits(&rule("missing-core-section"), "Just a paragraph").is_empty());
    }

    #[test]
    fn test_missing_email() {
        assert_eq!(hits(&rule("missing-email"), "Phone: (555) 123-4567").len(), 1);
        assert!(hits(&rule("missing-email"), "Email: a@example.com").is_empty());
    }
}
