//! Date formats: year-only ranges, numeric dates, seasonal and relative wording

use super::{splice, RawHit, Rule, RuleContext, RuleScope};
use crate::document::{DateKind, DateToken, Document};
use crate::error::MatchError;
use crate::patterns::MONTHS;
use ats_types::{Category, Severity};

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "date-year-only",
            category: Category::DateFormat,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_year_only_ranges,
            message_template: "Year-only date range '{text}' hides employment length",
            suggestion_template: "Use full month and year, e.g. {context}",
            exceptions: &[],
        },
        Rule {
            id: "date-numeric",
            category: Category::DateFormat,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_numeric_dates,
            message_template: "Numeric date '{text}' is ambiguous to ATS parsers",
            suggestion_template: "Spell out the month, e.g. {context}",
            exceptions: &[],
        },
        Rule {
            id: "date-relative",
            category: Category::DateFormat,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_vague_dates,
            message_template: "Vague date '{text}' cannot be placed on a timeline",
            suggestion_template: "Replace with an explicit month and year, e.g. {context}",
            exceptions: &[],
        },
    ]
}

pub fn find_year_only_ranges(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(tokens(document, &[DateKind::YearRange], |token| {
        let (from, to) = split_range(&token.text)?;
        let to = if to.chars().all(|c| c.is_ascii_digit()) {
            format!("March {to}")
        } else {
            "Present".to_string()
        };
        Some(format!("January {from} - {to}"))
    }))
}

pub fn find_numeric_dates(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(tokens(document, &[DateKind::Numeric], |token| {
        let mut parts = token.text.split('/');
        let month: usize = parts.next()?.parse().ok()?;
        let year = expand_year(parts.last()?)?;
        Some(format!("{} {year}", month_name(month)?))
    }))
}

pub fn find_vague_dates(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let hits = tokens(document, &[DateKind::Seasonal, DateKind::Relative], |token| {
        if token.kind != DateKind::Seasonal {
            return None;
        }
        let lowered = token.text.to_lowercase();
        let year = lowered.split_whitespace().last()?;
        let month = match lowered.split_whitespace().next()? {
            "spring" => 3,
            "summer" => 6,
            "fall" | "autumn" => 9,
            _ => 12,
        };
        Some(format!("{} {year}", month_name(month)?))
    });
    Ok(hits
        .into_iter()
        .map(|hit| {
            if hit.context.is_empty() {
                hit.with_context("January 2022")
            } else {
                hit
            }
        })
        .collect())
}

/// One hit per date token of the given kinds; `rewrite` produces the
/// Month YYYY replacement used for context and the corrected line
fn tokens<F>(document: &Document, kinds: &[DateKind], rewrite: F) -> Vec<RawHit>
where
    F: Fn(&DateToken) -> Option<String>,
{
    document
        .dates()
        .iter()
        .filter(|token| kinds.contains(&token.kind))
        .map(|token| {
            let hit = RawHit::new(token.line_number, token.text.as_str());
            match (rewrite(token), document.line(token.line_number)) {
                (Some(replacement), Some(line)) => hit
                    .with_corrected(splice(line, token.start, token.end, &replacement))
                    .with_context(replacement),
                _ => hit,
            }
        })
        .collect()
}

/// Split `2020-2024`, `2019 – Present` or `2018 to 2020` into its endpoints
fn split_range(text: &str) -> Option<(&str, &str)> {
    let from = text.get(..4)?;
    let rest = text[4..].trim_start();
    let rest = rest
        .strip_prefix('-')
        .or_else(|| rest.strip_prefix('–'))
        .or_else(|| rest.strip_prefix('—'))
        .or_else(|| rest.strip_prefix("to"))
        .or_else(|| rest.strip_prefix("TO"))
        .or_else(|| rest.strip_prefix("To"))?;
    Some((from, rest.trim_start()))
}

fn expand_year(year: &str) -> Option<u32> {
    let value: u32 = year.parse().ok()?;
    Some(match year.len() {
        2 if value < 50 => 2000 + value,
        2 => 1900 + value,
        _ => value,
    })
}

fn month_name(month: usize) -> Option<String> {
    let name = MONTHS.get(month.checked_sub(1)?)?;
    let mut chars = name.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{hits, lines, rule};

    #[test]
    fn test_year_only_range() {
        let found = hits(
            &rule("date-year-only"),
            "Software Engineer at TechCorp (2020-2024)",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "2020-2024");
        assert_eq!(found[0].context, "January 2020 - March 2024");
        assert_eq!(
            found[0].corrected.as_deref(),
            Some("Software Engineer at TechCorp (January 2020 - March 2024)")
        );
    }

    #[test]
    fn test_year_to_present() {
        let found = hits(&rule("date-year-only"), "Lead Engineer, 2019 – Present");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, "January 2019 - Present");
    }

    #[test]
    fn test_month_year_ranges_pass() {
        for id in ["date-year-only", "date-numeric", "date-relative"] {
            assert!(hits(&rule(id), "January 2020 - March 2024").is_empty());
        }
    }

    #[test]
    fn test_numeric_dates() {
        let found = hits(&rule("date-numeric"), "Started 03/21\nPromoted 11/15/2022");
        assert_eq!(lines(&found), vec![1, 2]);
        assert_eq!(found[0].context, "March 2021");
        assert_eq!(found[1].context, "November 2022");
        assert_eq!(found[0].corrected.as_deref(), Some("Started March 2021"));
    }

    #[test]
    fn test_seasonal_and_relative() {
        let found = hits(
            &rule("date-relative"),
            "Intern, Summer 2019\nJoined two years ago",
        );
        assert_eq!(lines(&found), vec![1, 2]);
        assert_eq!(found[0].context, "June 2019");
        assert_eq!(found[0].corrected.as_deref(), Some("Intern, June 2019"));
        assert_eq!(found[1].corrected, None);
    }

    #[test]
    fn test_split_range() {
        assert_eq!(split_range("2018 to 2020"), Some(("2018", "2020")));
        assert_eq!(split_range("2019—now"), Some(("2019", "now")));
        assert_eq!(month_name(13), None);
        assert_eq!(expand_year("99"), Some(1999));
    }
}
