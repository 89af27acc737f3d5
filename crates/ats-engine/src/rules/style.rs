//! Presentation problems: ALL-CAPS text, blank-line runs and stray markup

use super::{splice, RawHit, Rule, RuleContext, RuleScope};
use crate::document::Document;
use crate::error::MatchError;
use crate::patterns::{Pattern, KNOWN_ACRONYMS};
use ats_types::{Category, Severity};

static WORD: Pattern = Pattern::new(r"[A-Za-z][A-Za-z0-9]*");

static STRIKE_FENCE: Pattern =
    Pattern::new(r"(^|[^\w~])~~([^~\s](?:[^~\n]*[^~\s])?)~~");
static STRIKE_TAG: Pattern = Pattern::new(r"(?i)</?(?:s|del|strike)\b[^>]*>");

static UNDERLINE_FENCE: Pattern =
    Pattern::new(r"(^|[^\w+])\+\+([^+\s](?:[^+\n]*[^+\s])?)\+\+");
static UNDERLINE_TAG: Pattern = Pattern::new(r"(?i)</?(?:u|ins)\b[^>]*>");

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "all-caps",
            category: Category::AllCaps,
            severity: Severity::Medium,
            scope: RuleScope::All,
            matcher: find_all_caps,
            message_template: "ALL-CAPS text '{text}' is hard to parse and reads as shouting",
            suggestion_template: "Use title case: '{context}'",
            exceptions: KNOWN_ACRONYMS,
        },
        Rule {
            id: "excess-blank-lines",
            category: Category::Whitespace,
            severity: Severity::Low,
            scope: RuleScope::All,
            matcher: find_blank_line_runs,
            message_template: "{text}",
            suggestion_template: "Keep at most {context} blank lines between blocks",
            exceptions: &[],
        },
        Rule {
            id: "markup-strikethrough",
            category: Category::StrayMarkup,
            severity: Severity::Low,
            scope: RuleScope::All,
            matcher: find_strikethrough,
            message_template: "Strikethrough markup '{text}' is kept as plain text by parsers",
            suggestion_template: "Delete the struck text or remove the markup",
            exceptions: &[],
        },
        Rule {
            id: "markup-underline",
            category: Category::StrayMarkup,
            severity: Severity::Low,
            scope: RuleScope::All,
            matcher: find_underline,
            message_template: "Underline markup '{text}' is kept as plain text by parsers",
            suggestion_template: "Remove the underline markup; use bold for emphasis",
            exceptions: &[],
        },
    ]
}

/// Runs of capitalized words, reported when they hold a long unknown word
/// or several unknown words
pub fn find_all_caps(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let re = WORD.regex()?;
    let mut hits = Vec::new();

    for (line_number, line) in document.prose_lines() {
        let mut phrases: Vec<Vec<(usize, usize)>> = Vec::new();
        let mut current: Vec<(usize, usize)> = Vec::new();
        let mut last_end = 0;

        for m in re.find_iter(line) {
            let joined = line[last_end..m.start()]
                .chars()
                .all(|c| !c.is_alphanumeric());
            if (!joined || !is_caps_word(m.as_str())) && !current.is_empty() {
                phrases.push(std::mem::take(&mut current));
            }
            if is_caps_word(m.as_str()) {
                current.push((m.start(), m.end()));
            }
            last_end = m.end();
        }
        if !current.is_empty() {
            phrases.push(current);
        }

        for words in phrases {
            let unknown: Vec<&str> = words
                .iter()
                .map(|&(s, e)| &line[s..e])
                .filter(|w| !ctx.is_exempt(w))
                .collect();
            let long_unknown = unknown.iter().any(|w| letter_count(w) >= 4);
            if !long_unknown && unknown.len() < 2 {
                continue;
            }
            let (start, end) = (words[0].0, words[words.len() - 1].1);
            let titled = title_case(line, &words, ctx);
            hits.push(
                RawHit::new(line_number, &line[start..end])
                    .with_corrected(splice(line, start, end, &titled))
                    .with_context(titled),
            );
        }
    }
    Ok(hits)
}

/// Blank-line runs longer than the configured maximum, reported at the
/// first blank line of the run
pub fn find_blank_line_runs(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let max = ctx.config.max_blank_lines;
    let mut hits = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    let flush = |run: Option<(usize, usize)>, hits: &mut Vec<RawHit>| {
        if let Some((start, len)) = run {
            if len > max {
                hits.push(
                    RawHit::new(start, format!("{len} consecutive blank lines"))
                        .with_context(max.to_string()),
                );
            }
        }
    };

    for (line_number, line) in document.lines() {
        if line.trim().is_empty() {
            run = Some(match run {
                Some((start, len)) => (start, len + 1),
                None => (line_number, 1),
            });
        } else {
            flush(run.take(), &mut hits);
        }
    }
    flush(run, &mut hits);
    Ok(hits)
}

pub fn find_strikethrough(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    markup(document, &STRIKE_FENCE, &STRIKE_TAG)
}

pub fn find_underline(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    markup(document, &UNDERLINE_FENCE, &UNDERLINE_TAG)
}

/// Fenced markup (`~~x~~`, `++x++`) and opening tags, in line order
fn markup(
    document: &Document,
    fence: &Pattern,
    tag: &Pattern,
) -> Result<Vec<RawHit>, MatchError> {
    let fence = fence.regex()?;
    let tag = tag.regex()?;
    let mut hits = Vec::new();

    for (line_number, line) in document.prose_lines() {
        let mut spans: Vec<(usize, usize)> = fence
            .captures_iter(line)
            .filter_map(|caps| {
                let prefix = caps.get(1)?;
                let whole = caps.get(0)?;
                Some((prefix.end(), whole.end()))
            })
            .chain(
                tag.find_iter(line)
                    .filter(|m| !m.as_str().starts_with("</"))
                    .map(|m| (m.start(), m.end())),
            )
            .collect();
        if spans.is_empty() {
            continue;
        }
        spans.sort_unstable();

        let stripped = tag.replace_all(line, "");
        let corrected = fence.replace_all(&stripped, "${1}${2}").into_owned();
        for (start, end) in spans {
            hits.push(RawHit::new(line_number, &line[start..end]).with_corrected(corrected.clone()));
        }
    }
    Ok(hits)
}

fn is_caps_word(word: &str) -> bool {
    letter_count(word) >= 2 && !word.chars().any(|c| c.is_lowercase())
}

fn letter_count(word: &str) -> usize {
    word.chars().filter(|c| c.is_alphabetic()).count()
}

fn title_case(line: &str, words: &[(usize, usize)], ctx: &RuleContext<'_>) -> String {
    let (start, end) = (words[0].0, words[words.len() - 1].1);
    let mut out = String::with_capacity(end - start);
    let mut cursor = start;
    for &(s, e) in words {
        out.push_str(&line[cursor..s]);
        let word = &line[s..e];
        if ctx.is_exempt(word) {
            out.push_str(word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first);
                out.extend(chars.flat_map(char::to_lowercase));
            }
        }
        cursor = e;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::rules::test_support::{hits, hits_with, lines, rule};

    #[test]
    fn test_known_acronyms_are_exempt() {
        assert!(hits(&rule("all-caps"), "AWS, API, CEO").is_empty());
        assert!(hits(&rule("all-caps"), "Built a REST API on AWS with SQL").is_empty());
    }

    #[test]
    fn test_all_caps_phrases() {
        let found = hits(
            &rule("all-caps"),
            "## PROFESSIONAL EXPERIENCE\nSENIOR AWS ENGINEER at Acme\nShipped ABC and XYZ\nUsed XYZ",
        );
        assert_eq!(lines(&found), vec![1, 2]);
        assert_eq!(found[0].matched_text, "PROFESSIONAL EXPERIENCE");
        assert_eq!(found[0].corrected.as_deref(), Some("## Professional Experience"));
        assert_eq!(found[1].context, "Senior AWS Engineer");
    }

    #[test]
    fn test_two_short_unknown_words_form_a_phrase() {
        let found = hits(&rule("all-caps"), "Team of THE BIG");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "THE BIG");
    }

    #[test]
    fn test_blank_line_runs() {
        let found = hits(&rule("excess-blank-lines"), "a\n\n\nb\n\n\n\n\nc");
        assert_eq!(lines(&found), vec![5]);
        assert_eq!(found[0].matched_text, "4 consecutive blank lines");

        let strict = EngineConfig {
            max_blank_lines: 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            lines(&hits_with(&rule("excess-blank-lines"), "a\n\n\nb\n\n\n\n\nc", &strict)),
            vec![2, 5]
        );
    }

    #[test]
    fn test_strikethrough() {
        let found = hits(
            &rule("markup-strikethrough"),
            "Skills: ~~COBOL~~ Rust\n<del>Fortran</del> and <s>Pascal</s>",
        );
        assert_eq!(lines(&found), vec![1, 2, 2]);
        assert_eq!(found[0].matched_text, "~~COBOL~~");
        assert_eq!(found[0].corrected.as_deref(), Some("Skills: COBOL Rust"));
        assert_eq!(found[1].matched_text, "<del>");
        assert_eq!(found[1].corrected.as_deref(), Some("Fortran and Pascal"));
    }

    #[test]
    fn test_underline_ignores_cpp() {
        let found = hits(
            &rule("markup-underline"),
            "Languages: C++ and C++17\n++Led++ the team\n<u>Promoted</u> twice",
        );
        assert_eq!(lines(&found), vec![2, 3]);
        assert_eq!(found[0].matched_text, "++Led++");
        assert_eq!(found[1].corrected.as_deref(), Some("Promoted twice"));
    }
}
