//! Tables, multi-column layouts and image placement

use super::{RawHit, Rule, RuleContext, RuleScope};
use crate::document::Document;
use crate::error::MatchError;
use crate::patterns::{Pattern, IMAGE_REFERENCE};
use ats_types::{Category, Severity};

static COLUMN_LAYOUT: Pattern = Pattern::new(
    r#"(?i)column-count\s*:|columns\s*:\s*\d|column-width\s*:|float\s*:\s*(?:left|right)|display\s*:\s*(?:flex|grid|inline-block|table)|position\s*:\s*absolute|<div[^>]*\bclass\s*=\s*["'][^"']*\bcol(?:umn)?s?\b|^\s*:::\s*\{?\s*\.?columns?\b"#,
);

static HTML_TABLE: Pattern = Pattern::new(r"(?i)<table\b");

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "table-markdown",
            category: Category::TableUsage,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_markdown_tables,
            message_template: "Table row '{text}' will be read out of order by ATS parsers",
            suggestion_template: "Rewrite the table as a bulleted list{context}",
            exceptions: &[],
        },
        Rule {
            id: "table-html",
            category: Category::TableUsage,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_html_tables,
            message_template: "HTML table markup '{text}'",
            suggestion_template: "Replace the table with plain lines or a bulleted list",
            exceptions: &[],
        },
        Rule {
            id: "layout-columns",
            category: Category::MultiColumnLayout,
            severity: Severity::Critical,
            scope: RuleScope::All,
            matcher: find_column_layouts,
            message_template: "Multi-column layout markup '{text}'",
            suggestion_template: "Use a single-column layout; parsers read columns line by line across the page",
            exceptions: &[],
        },
        Rule {
            id: "image-near-contact",
            category: Category::ImagePlacement,
            severity: Severity::Critical,
            scope: RuleScope::All,
            matcher: find_images_near_contact,
            message_template: "Image '{text}' placed in {context}",
            suggestion_template: "Remove the image; ATS parsers skip images and can drop the text around them",
            exceptions: &[],
        },
    ]
}

/// Every row of every qualifying pipe table, separator rows included
pub fn find_markdown_tables(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let mut hits = Vec::new();
    for table in document.tables() {
        for line_number in table.rows() {
            let Some(line) = document.line(line_number) else {
                continue;
            };
            let mut hit = RawHit::new(line_number, line.trim());
            if Some(line_number) != table.separator_line {
                let cells = table_cells(line);
                if !cells.is_empty() {
                    hit = hit
                        .with_context(format!(", e.g. '- {}'", cells.join(": ")))
                        .with_corrected(format!("- {}", cells.join(": ")));
                }
            }
            hits.push(hit);
        }
    }
    Ok(hits)
}

pub fn find_html_tables(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    line_matches(document, &HTML_TABLE)
}

pub fn find_column_layouts(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    line_matches(document, &COLUMN_LAYOUT)
}

/// Images in the document header, in the contact or experience sections, or
/// within a few lines of contact details
pub fn find_images_near_contact(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let image = IMAGE_REFERENCE.regex()?;
    let proximity = ctx.config.image_proximity_lines;
    let first_section = document.first_section_line();

    let mut hits = Vec::new();
    for (line_number, line) in document.prose_lines() {
        let Some(m) = image.find(line) else {
            continue;
        };
        let near_contact = document
            .contacts()
            .iter()
            .any(|c| c.line_number.abs_diff(line_number) <= proximity);
        let section = document.section_for(line_number).map(|h| h.text.to_lowercase());

        let placement = if near_contact {
            "close to contact details".to_string()
        } else if first_section.is_some_and(|first| line_number < first) {
            "the document header".to_string()
        } else if let Some(name) = section.filter(|s| s.contains("contact") || s.contains("experience")) {
            format!("the {name} section")
        } else {
            continue;
        };
        hits.push(RawHit::new(line_number, m.as_str()).with_context(placement));
    }
    Ok(hits)
}

fn line_matches(document: &Document, pattern: &Pattern) -> Result<Vec<RawHit>, MatchError> {
    let re = pattern.regex()?;
    Ok(document
        .prose_lines()
        .filter_map(|(line_number, line)| {
            re.find(line)
                .map(|m| RawHit::new(line_number, m.as_str().trim()))
        })
        .collect())
}

fn table_cells(line: &str) -> Vec<&str> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}
