//! Document model
//!
//! Normalizes raw input into 1-indexed lines and derives the structural facts
//! several rule families share: Markdown headers, contact-like tokens,
//! date-like tokens, candidate table blocks and fenced code lines.

use crate::error::{InputError, ValidationError};
use crate::patterns::{
    Pattern, ATX_HEADER, EMAIL, NUMERIC_DATE, OBFUSCATED_EMAIL, PHONE, RELATIVE_DATE,
    SEASONAL_DATE, TABLE_SEPARATOR, URL, YEAR_RANGE,
};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Pseudo rule id used when a document-model pattern fails
pub const DOCUMENT_MODEL_ID: &str = "document-model";

/// A Markdown ATX header (`## Experience`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub line_number: usize,
    /// Number of leading `#` characters (1-6)
    pub level: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactKind {
    Email,
    Phone,
    Url,
    ObfuscatedEmail,
}

/// Contact-like token with its byte span inside the line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactToken {
    pub line_number: usize,
    pub kind: ContactKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DateKind {
    /// `2020-2024`, `2019 - Present`
    YearRange,
    /// `01/20`, `3/4/21`
    Numeric,
    /// `Summer 2021`
    Seasonal,
    /// `two years ago`, `last year`
    Relative,
}

/// Date-like token with its byte span inside the line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateToken {
    pub line_number: usize,
    pub kind: DateKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Consecutive lines that look like a Markdown pipe table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub separator_line: Option<usize>,
}

impl TableBlock {
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.start_line..=self.end_line
    }
}

/// Immutable, line-addressable view of the document under validation
#[derive(Debug, Clone)]
pub struct Document {
    filename: String,
    raw_text: String,
    lines: Vec<String>,
    code_lines: Vec<bool>,
    headers: Vec<Header>,
    contacts: Vec<ContactToken>,
    dates: Vec<DateToken>,
    tables: Vec<TableBlock>,
}

impl Document {
    /// Decode bytes as UTF-8 and build the document
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Result<Self, ValidationError> {
        let text = std::str::from_utf8(bytes).map_err(|e| InputError::NotText {
            offset: e.valid_up_to(),
        })?;
        Self::parse(filename, text)
    }

    /// Build the document from text
    pub fn parse(filename: &str, text: &str) -> Result<Self, ValidationError> {
        let normalized = text
            .strip_prefix('\u{feff}')
            .unwrap_or(text)
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        if normalized.trim().is_empty() {
            return Err(InputError::Empty.into());
        }

        let lines: Vec<String> = normalized.lines().map(str::to_string).collect();
        let code_lines = Self::detect_code_lines(&lines);

        let mut document = Document {
            filename: filename.to_string(),
            raw_text: normalized,
            lines,
            code_lines,
            headers: Vec::new(),
            contacts: Vec::new(),
            dates: Vec::new(),
            tables: Vec::new(),
        };

        document.headers = document.detect_headers()?;
        document.contacts = document.detect_contacts()?;
        document.dates = document.detect_dates()?;
        document.tables = document.detect_tables()?;

        Ok(document)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line by 1-indexed number
    pub fn line(&self, line_number: usize) -> Option<&str> {
        line_number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// All lines with their 1-indexed numbers
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.as_str()))
    }

    /// Lines outside fenced code blocks
    pub fn prose_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines().filter(|(n, _)| !self.is_code(*n))
    }

    pub fn is_code(&self, line_number: usize) -> bool {
        line_number
            .checked_sub(1)
            .and_then(|idx| self.code_lines.get(idx))
            .copied()
            .unwrap_or(false)
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn contacts(&self) -> &[ContactToken] {
        &self.contacts
    }

    pub fn contacts_of(&self, kind: ContactKind) -> impl Iterator<Item = &ContactToken> {
        self.contacts.iter().filter(move |c| c.kind == kind)
    }

    pub fn dates(&self) -> &[DateToken] {
        &self.dates
    }

    pub fn tables(&self) -> &[TableBlock] {
        &self.tables
    }

    /// Header whose section contains `line_number` (nearest preceding header
    /// of level 1 or 2)
    pub fn section_for(&self, line_number: usize) -> Option<&Header> {
        self.headers
            .iter()
            .take_while(|h| h.line_number <= line_number)
            .filter(|h| h.level <= 2)
            .last()
    }

    /// Line number of the first level-2 header, if any
    pub fn first_section_line(&self) -> Option<usize> {
        self.headers
            .iter()
            .find(|h| h.level == 2)
            .map(|h| h.line_number)
    }

    /// Lowercase hex SHA-256 of the normalized text
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.raw_text.as_bytes()))
    }

    // ========================================================================
    // Derived facts
    // ========================================================================

    fn detect_code_lines(lines: &[String]) -> Vec<bool> {
        let mut in_fence = false;
        lines
            .iter()
            .map(|line| {
                let trimmed = line.trim_start();
                if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                    in_fence = !in_fence;
                    true
                } else {
                    in_fence
                }
            })
            .collect()
    }

    fn detect_headers(&self) -> Result<Vec<Header>, ValidationError> {
        let re = model_regex(&ATX_HEADER)?;
        Ok(self
            .prose_lines()
            .filter_map(|(line_number, line)| {
                let caps = re.captures(line)?;
                Some(Header {
                    line_number,
                    level: caps.get(1)?.as_str().len(),
                    text: caps.get(2)?.as_str().trim().to_string(),
                })
            })
            .collect())
    }

    fn detect_contacts(&self) -> Result<Vec<ContactToken>, ValidationError> {
        let email = model_regex(&EMAIL)?;
        let obfuscated = model_regex(&OBFUSCATED_EMAIL)?;
        let phone = model_regex(&PHONE)?;
        let url = model_regex(&URL)?;

        let mut tokens = Vec::new();
        for (line_number, line) in self.prose_lines() {
            let mut line_tokens: Vec<ContactToken> = Vec::new();
            let mut push = |kind: ContactKind, start: usize, end: usize| {
                line_tokens.push(ContactToken {
                    line_number,
                    kind,
                    text: line[start..end].to_string(),
                    start,
                    end,
                });
            };

            let emails: Vec<(usize, usize)> = email
                .find_iter(line)
                .map(|m| {
                    push(ContactKind::Email, m.start(), m.end());
                    (m.start(), m.end())
                })
                .collect();
            let overlaps_email =
                |s: usize, e: usize| emails.iter().any(|&(es, ee)| s < ee && es < e);

            // `[at]` and `[dot]` markers of one address form a single token
            let markers: Vec<regex::Match<'_>> = obfuscated.find_iter(line).collect();
            if let (Some(first), Some(last)) = (markers.first(), markers.last()) {
                let (start, end) = obfuscated_span(line, first.start(), last.end());
                push(ContactKind::ObfuscatedEmail, start, end);
            }
            for m in phone.find_iter(line) {
                if !overlaps_email(m.start(), m.end()) {
                    push(ContactKind::Phone, m.start(), m.end());
                }
            }
            for m in url.find_iter(line) {
                if !overlaps_email(m.start(), m.end()) {
                    push(ContactKind::Url, m.start(), m.end());
                }
            }

            line_tokens.sort_by_key(|t| (t.start, t.end));
            tokens.extend(line_tokens);
        }
        Ok(tokens)
    }

    fn detect_dates(&self) -> Result<Vec<DateToken>, ValidationError> {
        let families: [(DateKind, &Regex); 4] = [
            (DateKind::YearRange, model_regex(&YEAR_RANGE)?),
            (DateKind::Numeric, model_regex(&NUMERIC_DATE)?),
            (DateKind::Seasonal, model_regex(&SEASONAL_DATE)?),
            (DateKind::Relative, model_regex(&RELATIVE_DATE)?),
        ];

        let mut tokens = Vec::new();
        for (line_number, line) in self.prose_lines() {
            // Digits inside URLs and phone numbers are not dates
            let occupied: Vec<(usize, usize)> = self
                .contacts
                .iter()
                .filter(|c| c.line_number == line_number)
                .map(|c| (c.start, c.end))
                .collect();

            let mut line_tokens: Vec<DateToken> = Vec::new();
            for (kind, re) in &families {
                for m in re.find_iter(line) {
                    let overlaps = |s: usize, e: usize| m.start() < e && s < m.end();
                    let taken = occupied.iter().any(|&(s, e)| overlaps(s, e))
                        || line_tokens.iter().any(|t| overlaps(t.start, t.end));
                    if taken {
                        continue;
                    }
                    line_tokens.push(DateToken {
                        line_number,
                        kind: *kind,
                        text: m.as_str().to_string(),
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
            line_tokens.sort_by_key(|t| t.start);
            tokens.extend(line_tokens);
        }
        Ok(tokens)
    }

    fn detect_tables(&self) -> Result<Vec<TableBlock>, ValidationError> {
        let separator = model_regex(&TABLE_SEPARATOR)?;
        let mut blocks = Vec::new();
        let mut current: Option<(usize, usize)> = None;

        let close = |start: usize, end: usize, blocks: &mut Vec<TableBlock>| {
            let separator_line =
                (start..=end).find(|&n| self.line(n).is_some_and(|l| separator.is_match(l.trim())));
            let has_outer_pipes = (start..=end).any(|n| {
                self.line(n).is_some_and(|l| {
                    let t = l.trim();
                    t.len() > 1 && t.starts_with('|') && t.ends_with('|')
                })
            });
            if separator_line.is_some() || has_outer_pipes {
                blocks.push(TableBlock {
                    start_line: start,
                    end_line: end,
                    separator_line,
                });
            }
        };

        for (line_number, line) in self.lines() {
            let is_pipe_line = !self.is_code(line_number) && line.contains('|');
            current = match (current, is_pipe_line) {
                (Some((start, _)), true) => Some((start, line_number)),
                (None, true) => Some((line_number, line_number)),
                (Some((start, end)), false) => {
                    close(start, end, &mut blocks);
                    None
                }
                (None, false) => None,
            };
        }
        if let Some((start, end)) = current {
            close(start, end, &mut blocks);
        }
        Ok(blocks)
    }
}

/// Widen a span of bracketed markers to the words on either side, so
/// `jane [at] example [dot] com` is reported whole
fn obfuscated_span(line: &str, start: usize, end: usize) -> (usize, usize) {
    let span = &line[start..end];
    let start = if span.starts_with(['[', '(']) {
        let before = line[..start].trim_end();
        before.len()
            - before
                .chars()
                .rev()
                .take_while(|c| !c.is_whitespace())
                .map(char::len_utf8)
                .sum::<usize>()
    } else {
        start
    };
    let end = if span.ends_with([']', ')']) {
        let after = &line[end..];
        let rest = after.trim_start();
        let word: usize = rest
            .chars()
            .take_while(|c| !c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        end + (after.len() - rest.len()) + word
    } else {
        end
    };
    (start, end)
}

fn model_regex(pattern: &'static Pattern) -> Result<&'static Regex, ValidationError> {
    pattern.regex().map_err(|source| ValidationError::Internal {
        rule_id: DOCUMENT_MODEL_ID.to_string(),
        source,
    })
}
