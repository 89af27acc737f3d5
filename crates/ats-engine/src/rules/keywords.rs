//! Keyword hygiene: hidden text, keyword stuffing and creative job titles

use super::{RawHit, Rule, RuleContext, RuleScope};
use crate::document::Document;
use crate::error::MatchError;
use crate::patterns::Pattern;
use ats_types::{Category, Severity};
use std::collections::BTreeMap;

static HIDDEN_STYLE: Pattern = Pattern::new(
    r#"(?i)(?:^|[^-\w])color\s*:\s*(?:white\b|#f{3}(?:f{3})?\b|rgb\(\s*255\s*,\s*255\s*,\s*255\s*\))|font-size\s*:\s*0(?:px|pt|em|rem)?\s*(?:[;"']|$)|display\s*:\s*none|visibility\s*:\s*hidden|opacity\s*:\s*0(?:\.0+)?\s*(?:[;"']|$)"#,
);

static WORD: Pattern = Pattern::new(r"[A-Za-z][A-Za-z0-9+#]*");

static CREATIVE_TITLE: Pattern = Pattern::new(
    r"(?i)\b(?:ninja|rock\s?star|guru|wizard|jedi|unicorn|superhero|hero|code\s+monkey|whisperer|sherpa|maven|overlord|happiness)\b",
);

/// Function words that never count toward keyword density
const STOPWORDS: &[&str] = &[
    "about", "also", "and", "are", "but", "can", "for", "from", "had", "has", "have", "her", "his",
    "how", "into", "its", "not", "our", "out", "over", "per", "than", "that", "the", "their",
    "them", "they", "this", "was", "were", "what", "when", "where", "which", "who", "will", "with",
    "you", "your",
];

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "hidden-text",
            category: Category::KeywordHygiene,
            severity: Severity::Critical,
            scope: RuleScope::All,
            matcher: find_hidden_text,
            message_template: "Invisible text styling '{text}'",
            suggestion_template: "Remove hidden text; ATS vendors flag it as keyword manipulation",
            exceptions: &[],
        },
        Rule {
            id: "keyword-stuffing",
            category: Category::KeywordHygiene,
            severity: Severity::Critical,
            scope: RuleScope::All,
            matcher: find_keyword_stuffing,
            message_template: "Term '{text}' is repeated {context}",
            suggestion_template: "Mention '{text}' where it describes real work and vary the wording elsewhere",
            exceptions: &[],
        },
        Rule {
            id: "creative-job-title",
            category: Category::JobTitles,
            severity: Severity::Medium,
            scope: RuleScope::All,
            matcher: find_creative_titles,
            message_template: "Creative job title term '{text}' will not match recruiter searches",
            suggestion_template: "Use a conventional title such as {context}",
            exceptions: &[],
        },
    ]
}

pub fn find_hidden_text(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let re = HIDDEN_STYLE.regex()?;
    Ok(document
        .lines()
        .filter_map(|(line_number, line)| {
            let m = re.find(line)?;
            let styling = m
                .as_str()
                .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
                .trim_end_matches([';', '"', '\'']);
            Some(RawHit::new(line_number, styling.trim()))
        })
        .collect())
}

/// Terms that dominate the text, reported once at their first occurrence
pub fn find_keyword_stuffing(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let re = WORD.regex()?;
    let mut total = 0usize;
    let mut terms: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for (line_number, line) in document.prose_lines() {
        for m in re.find_iter(line) {
            total += 1;
            let word = m.as_str().to_lowercase();
            let letters = word.chars().filter(char::is_ascii_alphabetic).count();
            if letters < 3 || STOPWORDS.contains(&word.as_str()) {
                continue;
            }
            terms.entry(word).or_insert((0, line_number)).0 += 1;
        }
    }
    if total == 0 {
        return Ok(Vec::new());
    }

    let config = ctx.config;
    Ok(terms
        .into_iter()
        .filter_map(|(term, (count, first_line))| {
            let density = count as f64 / total as f64;
            if count < config.stuffing_min_occurrences || density < config.stuffing_min_density {
                return None;
            }
            Some(RawHit::new(first_line, term).with_context(format!(
                "{count} times ({:.1}% of all words)",
                density * 100.0
            )))
        })
        .collect())
}

/// Denylisted words on lines that read like job titles
pub fn find_creative_titles(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let re = CREATIVE_TITLE.regex()?;
    let mut hits = Vec::new();
    for (line_number, line) in document.prose_lines() {
        if !is_title_like(document, line_number, line) {
            continue;
        }
        for m in re.find_iter(line) {
            let conventional = if m.as_str().eq_ignore_ascii_case("happiness") {
                "Customer Success Manager"
            } else {
                "Software Engineer, Developer or Specialist"
            };
            hits.push(RawHit::new(line_number, m.as_str()).with_context(conventional));
        }
    }
    Ok(hits)
}

fn is_title_like(document: &Document, line_number: usize, line: &str) -> bool {
    let trimmed = line.trim_start();
    document.headers().iter().any(|h| h.line_number == line_number)
        || trimmed.starts_with("**")
        || line.to_lowercase().contains(" at ")
}
