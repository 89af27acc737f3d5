//! Wording checks: first-person pronouns and undefined abbreviations

use super::{RawHit, Rule, RuleContext, RuleScope};
use crate::document::Document;
use crate::error::MatchError;
use crate::patterns::{Pattern, KNOWN_ACRONYMS};
use ats_types::{Category, Severity};
use std::collections::{HashMap, HashSet};

static PRONOUN: Pattern = Pattern::new(
    r"\b(?:I|[Mm]e|[Mm]y|[Mm]ine|[Mm]yself|[Ww]e|[Oo]ur|[Oo]urs|us)\b",
);

static ACRONYM: Pattern = Pattern::new(r"\b([A-Z]{2,5})s?\b");

/// `(SEO)` after the spelled-out form
static DEFINED_AFTER: Pattern = Pattern::new(r"\(([A-Z]{2,5})s?\)");

/// `SEO (Search Engine Optimization)`
static DEFINED_BEFORE: Pattern =
    Pattern::new(r"\b([A-Z]{2,5})s?\s+\([A-Z][a-z]+(?:[\s-]+[A-Za-z][a-z]*)+\)");

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "first-person-pronoun",
            category: Category::FirstPerson,
            severity: Severity::Low,
            scope: RuleScope::ResumeOnly,
            matcher: find_first_person,
            message_template: "First-person pronoun '{text}' in resume text",
            suggestion_template: "Start the line with an action verb and drop the pronoun",
            exceptions: &[],
        },
        Rule {
            id: "undefined-abbreviation",
            category: Category::Abbreviations,
            severity: Severity::Low,
            scope: RuleScope::All,
            matcher: find_undefined_abbreviations,
            message_template: "Abbreviation '{text}' is used {context}",
            suggestion_template: "Spell it out on first use, e.g. 'Full Name ({text})'",
            exceptions: KNOWN_ACRONYMS,
        },
    ]
}

/// First pronoun on each line
pub fn find_first_person(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let re = PRONOUN.regex()?;
    Ok(document
        .prose_lines()
        .filter_map(|(line_number, line)| {
            re.find(line).map(|m| RawHit::new(line_number, m.as_str()))
        })
        .collect())
}

/// Acronyms whose first use comes before their definition, or that are
/// never defined; one hit per acronym
pub fn find_undefined_abbreviations(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let acronym = ACRONYM.regex()?;
    let defined_after = DEFINED_AFTER.regex()?;
    let defined_before = DEFINED_BEFORE.regex()?;

    let mut definitions: HashMap<&str, usize> = HashMap::new();
    for (line_number, line) in document.prose_lines() {
        let defined = defined_after
            .captures_iter(line)
            .chain(defined_before.captures_iter(line))
            .filter_map(|caps| caps.get(1));
        for m in defined {
            definitions.entry(m.as_str()).or_insert(line_number);
        }
    }

    let mut reported = HashSet::new();
    let mut hits = Vec::new();
    for (line_number, line) in document.prose_lines() {
        if !line.chars().any(char::is_lowercase) {
            continue;
        }
        for caps in acronym.captures_iter(line) {
            let Some(m) = caps.get(1) else {
                continue;
            };
            let abbr = m.as_str();
            if ctx.is_exempt(abbr) || is_roman_numeral(abbr) || !reported.insert(abbr) {
                continue;
            }
            let problem = match definitions.get(abbr) {
                Some(&defined) if defined <= line_number => continue,
                Some(_) => "before it is defined",
                None => "without being defined",
            };
            hits.push(RawHit::new(line_number, abbr).with_context(problem));
        }
    }
    Ok(hits)
}

fn is_roman_numeral(token: &str) -> bool {
    token.chars().all(|c| "IVXLCDM".contains(c))
}
