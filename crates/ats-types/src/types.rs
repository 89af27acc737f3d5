use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a rule violation, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Document will be misread or rejected by most parsers
    Critical,
    /// Likely to lose or garble important content
    High,
    /// Degrades parsing quality
    Medium,
    /// Minor style issue
    Low,
    /// Non-graded note; surfaced as a recommendation, never as a finding
    Advisory,
}

impl Severity {
    /// Severities that are counted and rendered as findings, in report order
    pub const GRADED: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Advisory => "ADVISORY",
        }
    }

    /// Label used in summaries, e.g. "High Severity Issues"
    pub fn summary_label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical Issues",
            Severity::High => "High Severity Issues",
            Severity::Medium => "Medium Severity Issues",
            Severity::Low => "Low Severity Issues",
            Severity::Advisory => "Advisory Notes",
        }
    }

    /// Section heading used in the persisted report
    pub fn section_heading(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical Issues (Must Fix)",
            Severity::High => "High Severity Issues (Should Fix)",
            Severity::Medium => "Medium Severity Issues (Consider Fixing)",
            Severity::Low => "Low Severity Issues (Optional)",
            Severity::Advisory => "Advisory Notes",
        }
    }

    pub fn is_graded(&self) -> bool {
        !matches!(self, Severity::Advisory)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detection category a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    UnicodeSymbols,
    SmartPunctuation,
    ContactFormatting,
    PhoneFormat,
    DateFormat,
    TableUsage,
    MultiColumnLayout,
    ImagePlacement,
    SectionHeaders,
    HeaderHierarchy,
    AllCaps,
    Whitespace,
    StrayMarkup,
    KeywordHygiene,
    JobTitles,
    FirstPerson,
    Abbreviations,
    DocumentStructure,
}

impl Category {
    /// Stable machine identifier (matches the serde representation)
    pub fn slug(&self) -> &'static str {
        match self {
            Category::UnicodeSymbols => "unicode-symbols",
            Category::SmartPunctuation => "smart-punctuation",
            Category::ContactFormatting => "contact-formatting",
            Category::PhoneFormat => "phone-format",
            Category::DateFormat => "date-format",
            Category::TableUsage => "table-usage",
            Category::MultiColumnLayout => "multi-column-layout",
            Category::ImagePlacement => "image-placement",
            Category::SectionHeaders => "section-headers",
            Category::HeaderHierarchy => "header-hierarchy",
            Category::AllCaps => "all-caps",
            Category::Whitespace => "whitespace",
            Category::StrayMarkup => "stray-markup",
            Category::KeywordHygiene => "keyword-hygiene",
            Category::JobTitles => "job-titles",
            Category::FirstPerson => "first-person",
            Category::Abbreviations => "abbreviations",
            Category::DocumentStructure => "document-structure",
        }
    }

    /// Human-readable name used in report headings
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::UnicodeSymbols => "Emoji or Special Character",
            Category::SmartPunctuation => "Smart Punctuation",
            Category::ContactFormatting => "Contact Formatting",
            Category::PhoneFormat => "Phone Format",
            Category::DateFormat => "Date Format",
            Category::TableUsage => "Table Usage",
            Category::MultiColumnLayout => "Multi-Column Layout",
            Category::ImagePlacement => "Image Placement",
            Category::SectionHeaders => "Section Header",
            Category::HeaderHierarchy => "Header Hierarchy",
            Category::AllCaps => "All Caps",
            Category::Whitespace => "Excess Whitespace",
            Category::StrayMarkup => "Stray Markup",
            Category::KeywordHygiene => "Keyword Hygiene",
            Category::JobTitles => "Creative Job Title",
            Category::FirstPerson => "First-Person Pronoun",
            Category::Abbreviations => "Undefined Abbreviation",
            Category::DocumentStructure => "Document Structure",
        }
    }

    /// One-line remediation tip added to recommendations when the category has findings
    pub fn remediation(&self) -> &'static str {
        match self {
            Category::UnicodeSymbols => "Replace emojis and decorative symbols with plain words",
            Category::SmartPunctuation => {
                "Use straight quotes, hyphens and three periods instead of typographic glyphs"
            }
            Category::ContactFormatting => {
                "Label every contact detail explicitly (Email:, Phone:, LinkedIn:)"
            }
            Category::PhoneFormat => "Write phone numbers as (555) 123-4567 or 555-123-4567",
            Category::DateFormat => "Write every date as Month YYYY - Month YYYY",
            Category::TableUsage => "Convert tables to bulleted lists",
            Category::MultiColumnLayout => "Use a single-column layout without floats or grids",
            Category::ImagePlacement => "Keep images away from contact details and work history",
            Category::SectionHeaders => {
                "Use conventional section names such as Experience, Education and Skills"
            }
            Category::HeaderHierarchy => "Keep one top-level header and step header levels by one",
            Category::AllCaps => "Reserve capitals for acronyms; write words in normal case",
            Category::Whitespace => "Collapse runs of blank lines to a single blank line",
            Category::StrayMarkup => "Remove strikethrough and underline markup",
            Category::KeywordHygiene => {
                "Remove hidden text and use keywords naturally in context"
            }
            Category::JobTitles => "Use conventional job titles that recruiters search for",
            Category::FirstPerson => "Start bullet points with action verbs instead of pronouns",
            Category::Abbreviations => "Spell out abbreviations on first use, e.g. Service Level Agreement (SLA)",
            Category::DocumentStructure => "Include the standard resume sections",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Kind of document being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    #[default]
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "resume" | "cv" | "profile" => Some(DocumentKind::Resume),
            "cover-letter" | "cover_letter" | "coverletter" | "letter" => {
                Some(DocumentKind::CoverLetter)
            }
            _ => None,
        }
    }
}

/// A single rule violation tied to a line of the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    /// 1-indexed line in the source document
    pub line_number: usize,
    pub found_text: String,
    pub issue_text: String,
    pub suggestion_text: String,
    /// Corrected form of the offending line, when one can be derived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Overall outcome of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pass,
    Warning,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warning => "WARNING",
            Status::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding counts per graded severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(rename = "CRITICAL")]
    pub critical: usize,
    #[serde(rename = "HIGH")]
    pub high: usize,
    #[serde(rename = "MEDIUM")]
    pub medium: usize,
    #[serde(rename = "LOW")]
    pub low: usize,
}

impl SeverityCounts {
    /// Count findings by severity. Advisory entries are not counted.
    pub fn tally<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut counts = SeverityCounts::default();
        for finding in findings {
            counts.increment(finding.severity);
        }
        counts
    }

    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Advisory => {}
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Advisory => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}
