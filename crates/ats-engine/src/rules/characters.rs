//! Emoji, dingbats and typographic punctuation

use super::{RawHit, Rule, RuleContext, RuleScope};
use crate::document::Document;
use crate::error::MatchError;
use crate::patterns::is_symbol_char;
use ats_types::{Category, Severity};

/// Symbols that are safe in resumes (compensation, temperatures, company names)
pub const ALLOWED_SYMBOLS: &[&str] = &["$", "€", "£", "¥", "₹", "₩", "₽", "°", "&"];

/// Typographic glyphs and their ASCII equivalents
pub const SMART_PUNCTUATION: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2026}', "..."),
];

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "emoji-symbols",
            category: Category::UnicodeSymbols,
            severity: Severity::Critical,
            scope: RuleScope::All,
            matcher: find_symbols,
            message_template: "Disallowed characters: '{text}' ({context})",
            suggestion_template: "Remove emojis and special characters or replace them with words",
            exceptions: ALLOWED_SYMBOLS,
        },
        Rule {
            id: "smart-punctuation",
            category: Category::SmartPunctuation,
            severity: Severity::Medium,
            scope: RuleScope::All,
            matcher: find_smart_punctuation,
            message_template: "Typographic character '{text}' may be garbled by ATS parsers",
            suggestion_template: "Replace '{text}' with '{context}'",
            exceptions: &[],
        },
    ]
}

/// Maximal runs of emoji/dingbat/symbol code points, minus the allow-list
pub fn find_symbols(document: &Document, ctx: &RuleContext<'_>) -> Result<Vec<RawHit>, MatchError> {
    let mut hits = Vec::new();
    for (line_number, line) in document.lines() {
        let mut run: Option<(usize, usize)> = None;
        let mut runs = Vec::new();
        for (idx, c) in line.char_indices() {
            let flagged = is_symbol_char(c) && !ctx.is_exempt(c.encode_utf8(&mut [0; 4]));
            run = match (run, flagged) {
                (Some((start, _)), true) => Some((start, idx + c.len_utf8())),
                (None, true) => Some((idx, idx + c.len_utf8())),
                (Some(span), false) => {
                    runs.push(span);
                    None
                }
                (None, false) => None,
            };
        }
        runs.extend(run);

        for &(start, end) in &runs {
            let symbols = &line[start..end];
            let code_points = symbols
                .chars()
                .map(|c| format!("U+{:04X}", c as u32))
                .collect::<Vec<_>>()
                .join(" ");
            hits.push(
                RawHit::new(line_number, symbols)
                    .with_context(code_points)
                    .with_corrected(strip_spans(line, &runs)),
            );
        }
    }
    Ok(hits)
}

/// Curly quotes, en/em dashes and ellipsis glyphs, one hit per occurrence
pub fn find_smart_punctuation(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let mut hits = Vec::new();
    for (line_number, line) in document.lines() {
        let mut corrected: Option<String> = None;
        for c in line.chars() {
            let Some(ascii) = ascii_equivalent(c) else {
                continue;
            };
            let corrected = corrected.get_or_insert_with(|| to_ascii_punctuation(line));
            hits.push(
                RawHit::new(line_number, c.to_string())
                    .with_context(ascii)
                    .with_corrected(corrected.clone()),
            );
        }
    }
    Ok(hits)
}

fn ascii_equivalent(c: char) -> Option<&'static str> {
    SMART_PUNCTUATION
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, ascii)| *ascii)
}

/// Replace every typographic glyph in `line` with its ASCII equivalent
pub fn to_ascii_punctuation(line: &str) -> String {
    line.chars().fold(String::with_capacity(line.len()), |mut out, c| {
        match ascii_equivalent(c) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        }
        out
    })
}

fn strip_spans(line: &str, spans: &[(usize, usize)]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for &(start, end) in spans {
        out.push_str(&line[cursor..start]);
        cursor = end;
    }
    out.push_str(&line[cursor..]);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
