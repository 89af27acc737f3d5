//! Regex patterns, keyword tables and character classes shared by the
//! document model and the rule families

use crate::error::MatchError;
use once_cell::sync::OnceCell;
use regex::Regex;

/// A regex compiled on first use
///
/// Compilation errors are kept and returned to every caller instead of
/// panicking, so a bad pattern surfaces as a `MatchError` for the rule that
/// uses it.
pub struct Pattern {
    source: &'static str,
    compiled: OnceCell<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn regex(&self) -> Result<&Regex, MatchError> {
        self.compiled
            .get_or_init(|| Regex::new(self.source))
            .as_ref()
            .map_err(|e| MatchError::Pattern {
                pattern: self.source.to_string(),
                message: e.to_string(),
            })
    }
}

// ============================================================================
// Contact information
// ============================================================================

pub static EMAIL: Pattern = Pattern::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b");

pub static PHONE: Pattern =
    Pattern::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b");

/// Scheme, host and path match in any case; the top-level domain must be
/// lowercase so prose like `ASP.NET` is not taken for a link
pub static URL: Pattern = Pattern::new(
    r"\b(?i:https?://)?(?i:www\.)?[A-Za-z0-9][A-Za-z0-9-]*(?:\.[A-Za-z0-9-]+)*\.(?:com|org|net|io|dev|me|co|edu|gov|app|ai|info|tech|us|uk|ca|de)\b(?:/[^\s)\]>]*)?",
);

pub static OBFUSCATED_EMAIL: Pattern = Pattern::new(
    r"(?i:\[\s*at\s*\]|\[\s*dot\s*\]|\(\s*at\s*\)|\(\s*dot\s*\))|\b[\w.+-]+\s+AT\s+[\w-]+\s+DOT\s+[A-Za-z]{2,}\b",
);

/// Labels accepted before an email address
pub const EMAIL_LABELS: &[&str] = &["email:", "e-mail:", "mail:", "contact:"];

/// Labels accepted before a phone number
pub const PHONE_LABELS: &[&str] = &["phone:", "tel:", "telephone:", "mobile:", "cell:"];

/// Labels accepted before a URL
pub const URL_LABELS: &[&str] = &[
    "linkedin:",
    "linked-in:",
    "github:",
    "git-hub:",
    "website:",
    "web:",
    "portfolio:",
    "site:",
    "url:",
    "blog:",
];

/// Text that suggests a line carries contact details
pub const CONTACT_INDICATORS: &[&str] = &[
    "@", ".com", ".org", ".net", ".io", "phone", "email", "linkedin", "github",
];

// ============================================================================
// Dates
// ============================================================================

pub static YEAR_RANGE: Pattern = Pattern::new(
    r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|—|to)\s*((?:19|20)\d{2}|present|current|now)\b",
);

pub static NUMERIC_DATE: Pattern =
    Pattern::new(r"\b(?:0?[1-9]|1[0-2])/(?:\d{1,2}/)?(?:\d{4}|\d{2})\b");

pub static SEASONAL_DATE: Pattern =
    Pattern::new(r"(?i)\b(?:spring|summer|fall|autumn|winter)\s+(?:of\s+)?(?:19|20)\d{2}\b");

pub static RELATIVE_DATE: Pattern = Pattern::new(
    r"(?i)\b(?:(?:\d+|one|two|three|four|five|six|seven|eight|nine|ten|several|a\s+few)\s+(?:years?|months?)\s+ago|(?:last|this|next)\s+(?:year|month))\b",
);

// ============================================================================
// Markdown structure
// ============================================================================

pub static ATX_HEADER: Pattern = Pattern::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$");

pub static TABLE_SEPARATOR: Pattern =
    Pattern::new(r"^\|?\s*:?-{3,}:?\s*(?:\|\s*:?-{3,}:?\s*)+\|?\s*$");

pub static IMAGE_REFERENCE: Pattern = Pattern::new(r"(?i)!\[[^\]]*\]\([^)]*\)|<img\b");

// ============================================================================
// Keyword tables
// ============================================================================

/// Acronyms that are universally understood and never need defining
pub const KNOWN_ACRONYMS: &[&str] = &[
    "AI", "API", "APIS", "AWS", "AZURE", "B2B", "B2C", "BA", "BS", "BSC", "CD", "CEO", "CFO",
    "CI", "CIO", "COO", "CPU", "CRM", "CSS", "CTO", "DNS", "ERP", "ETL", "EU", "GCP", "GDPR",
    "GPA", "GPU", "HIPAA", "HR", "HTML", "HTTP", "HTTPS", "IBM", "IDE", "IOS", "IP", "ISO", "IT",
    "JSON", "KPI", "LLC", "MBA", "ML", "MS", "MSC", "NASA", "NLP", "NYC", "OK", "OOP", "PDF",
    "PHD", "PMP", "QA", "REST", "ROI", "SAAS", "SDK", "SEO", "SLA", "SQL", "SRE", "TCP", "UI",
    "UK", "UN", "US", "USA", "UX", "VP", "VPN", "XML", "YAML",
];

/// Full month names, used to build corrected date examples
pub const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

// ============================================================================
// Character classes
// ============================================================================

/// Code point ranges that ATS parsers drop or garble
pub const SYMBOL_RANGES: &[(u32, u32)] = &[
    (0x200D, 0x200D),   // zero width joiner
    (0x20A0, 0x20CF),   // currency symbols
    (0x2190, 0x21FF),   // arrows
    (0x2300, 0x23FF),   // miscellaneous technical
    (0x2460, 0x24FF),   // enclosed alphanumerics
    (0x25A0, 0x25FF),   // geometric shapes
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
    (0x2B00, 0x2BFF),   // miscellaneous symbols and arrows
    (0xFE0F, 0xFE0F),   // emoji presentation selector
    (0x1F000, 0x1F0FF), // mahjong, domino and playing cards
    (0x1F1E0, 0x1F1FF), // regional indicator flags
    (0x1F300, 0x1F5FF), // symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F700, 0x1F7FF), // alchemical and geometric extended
    (0x1F800, 0x1F8FF), // supplemental arrows-c
    (0x1F900, 0x1F9FF), // supplemental symbols and pictographs
    (0x1FA00, 0x1FAFF), // chess, symbols and pictographs extended-a
];

/// Whether a character falls inside one of the emoji/dingbat/symbol ranges
pub fn is_symbol_char(c: char) -> bool {
    let cp = c as u32;
    SYMBOL_RANGES
        .iter()
        .any(|&(start, end)| cp >= start && cp <= end)
}

/// Last `max_chars` characters of `text`
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().rev().nth(max_chars.saturating_sub(1)) {
        Some((idx, _)) if max_chars > 0 => &text[idx..],
        _ if max_chars == 0 => "",
        _ => text,
    }
}

/// Whether one of `labels` appears in the `window` characters before `start`
pub fn has_label_before(line: &str, start: usize, window: usize, labels: &[&str]) -> bool {
    let prefix = tail_chars(&line[..start], window).to_lowercase();
    labels.iter().any(|label| prefix.contains(label))
}
