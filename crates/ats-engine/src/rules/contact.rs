//! Contact information: labels, obfuscation, URL protocols and phone formats

use super::{splice, RawHit, Rule, RuleContext, RuleScope};
use crate::document::{ContactKind, ContactToken, Document};
use crate::error::MatchError;
use crate::patterns::{
    has_label_before, is_symbol_char, Pattern, CONTACT_INDICATORS, EMAIL_LABELS, PHONE_LABELS,
    URL_LABELS,
};
use ats_types::{Category, Severity};

/// Phone layouts parsers read reliably
static PHONE_FORMATS: [Pattern; 4] = [
    Pattern::new(r"^\(\d{3}\) \d{3}-\d{4}$"),
    Pattern::new(r"^\d{3}-\d{3}-\d{4}$"),
    Pattern::new(r"^\+\d{1,3}[ -]\(\d{3}\) \d{3}-\d{4}$"),
    Pattern::new(r"^\+\d{1,3}[ -]\d{3}-\d{3}-\d{4}$"),
];

pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "contact-unlabeled-email",
            category: Category::ContactFormatting,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_unlabeled_emails,
            message_template: "Email address '{text}' has no label",
            suggestion_template: "Prefix the address with a plain label: '{context}'",
            exceptions: &[],
        },
        Rule {
            id: "contact-unlabeled-phone",
            category: Category::ContactFormatting,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_unlabeled_phones,
            message_template: "Phone number '{text}' has no label",
            suggestion_template: "Prefix the number with a plain label: '{context}'",
            exceptions: &[],
        },
        Rule {
            id: "contact-unlabeled-url",
            category: Category::ContactFormatting,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_unlabeled_urls,
            message_template: "Link '{text}' has no label",
            suggestion_template: "Prefix the link with a plain label: '{context}'",
            exceptions: &[],
        },
        Rule {
            id: "contact-obfuscated-email",
            category: Category::ContactFormatting,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_obfuscated_emails,
            message_template: "Obfuscated email address '{text}' cannot be parsed",
            suggestion_template: "Write the address in plain form, e.g. Email: name@example.com",
            exceptions: &[],
        },
        Rule {
            id: "contact-emoji-label",
            category: Category::ContactFormatting,
            severity: Severity::High,
            scope: RuleScope::All,
            matcher: find_emoji_labels,
            message_template: "Contact detail labeled with symbol '{text}'",
            suggestion_template: "Replace the symbol with a text label such as '{context}'",
            exceptions: &[],
        },
        Rule {
            id: "contact-url-protocol",
            category: Category::ContactFormatting,
            severity: Severity::Medium,
            scope: RuleScope::All,
            matcher: find_urls_without_protocol,
            message_template: "Link '{text}' is missing its protocol",
            suggestion_template: "Write the full address: '{context}'",
            exceptions: &[],
        },
        Rule {
            id: "phone-format",
            category: Category::PhoneFormat,
            severity: Severity::Medium,
            scope: RuleScope::All,
            matcher: find_nonstandard_phones,
            message_template: "Phone number '{text}' uses a non-standard format",
            suggestion_template: "Use a standard format such as {context}",
            exceptions: &[],
        },
    ]
}

pub fn find_unlabeled_emails(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(unlabeled(document, ctx, ContactKind::Email, EMAIL_LABELS, |_| "Email: "))
}

pub fn find_unlabeled_phones(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(unlabeled(document, ctx, ContactKind::Phone, PHONE_LABELS, |_| "Phone: "))
}

pub fn find_unlabeled_urls(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(unlabeled(document, ctx, ContactKind::Url, URL_LABELS, url_label))
}

pub fn find_obfuscated_emails(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    Ok(document
        .contacts_of(ContactKind::ObfuscatedEmail)
        .map(|token| RawHit::new(token.line_number, token.text.as_str()))
        .collect())
}

/// Lines that open with a symbol and carry contact details (`📧 jane@…`)
pub fn find_emoji_labels(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let mut hits = Vec::new();
    for (line_number, line) in document.prose_lines() {
        let body = strip_list_marker(line.trim_start());
        let symbol_len: usize = body
            .chars()
            .take_while(|&c| is_symbol_char(c))
            .map(char::len_utf8)
            .sum();
        if symbol_len == 0 {
            continue;
        }
        let rest = body[symbol_len..].trim_start();
        let lowered = rest.to_lowercase();
        if !CONTACT_INDICATORS.iter().any(|i| lowered.contains(i)) {
            continue;
        }
        let label = suggested_label(&lowered);
        hits.push(
            RawHit::new(line_number, &body[..symbol_len])
                .with_context(label.trim_end())
                .with_corrected(format!("{label}{rest}")),
        );
    }
    Ok(hits)
}

/// Labeled links written without `http://` or `https://`
pub fn find_urls_without_protocol(
    document: &Document,
    ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let mut hits = Vec::new();
    for token in document.contacts_of(ContactKind::Url) {
        let Some(line) = document.line(token.line_number) else {
            continue;
        };
        let lowered = token.text.to_lowercase();
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            continue;
        }
        if !is_labeled(line, token, ctx.config.label_window, URL_LABELS) {
            continue;
        }
        let full = format!("https://{}", token.text);
        hits.push(
            RawHit::new(token.line_number, token.text.as_str())
                .with_corrected(splice(line, token.start, token.end, &full))
                .with_context(full),
        );
    }
    Ok(hits)
}

/// Phone numbers that match none of the accepted layouts
pub fn find_nonstandard_phones(
    document: &Document,
    _ctx: &RuleContext<'_>,
) -> Result<Vec<RawHit>, MatchError> {
    let formats = PHONE_FORMATS
        .iter()
        .map(Pattern::regex)
        .collect::<Result<Vec<_>, _>>()?;

    let mut hits = Vec::new();
    for token in document.contacts_of(ContactKind::Phone) {
        if formats.iter().any(|re| re.is_match(&token.text)) {
            continue;
        }
        let standard = standard_phone(&token.text);
        let mut hit = RawHit::new(token.line_number, token.text.as_str())
            .with_context(standard.as_deref().unwrap_or("(555) 123-4567"));
        if let (Some(standard), Some(line)) = (standard, document.line(token.line_number)) {
            hit = hit.with_corrected(splice(line, token.start, token.end, &standard));
        }
        hits.push(hit);
    }
    Ok(hits)
}

fn unlabeled(
    document: &Document,
    ctx: &RuleContext<'_>,
    kind: ContactKind,
    labels: &[&str],
    label_for: fn(&str) -> &'static str,
) -> Vec<RawHit> {
    document
        .contacts_of(kind)
        .filter_map(|token| {
            let line = document.line(token.line_number)?;
            if is_labeled(line, token, ctx.config.label_window, labels) {
                return None;
            }
            let label = label_for(&token.text);
            Some(
                RawHit::new(token.line_number, token.text.as_str())
                    .with_context(format!("{label}{}", token.text))
                    .with_corrected(splice(line, token.start, token.start, label)),
            )
        })
        .collect()
}

fn is_labeled(line: &str, token: &ContactToken, window: usize, labels: &[&str]) -> bool {
    has_label_before(line, token.start, window, labels) || is_link_target(line, token.start)
}

/// `[LinkedIn](https://…)` and `(mailto:…)` targets are labeled by their link text
fn is_link_target(line: &str, start: usize) -> bool {
    let prefix = line[..start].to_lowercase();
    prefix.ends_with("](") || prefix.ends_with("mailto:")
}

fn url_label(url: &str) -> &'static str {
    let lowered = url.to_lowercase();
    if lowered.contains("linkedin") {
        "LinkedIn: "
    } else if lowered.contains("github") {
        "GitHub: "
    } else {
        "Website: "
    }
}

fn suggested_label(lowered: &str) -> &'static str {
    if lowered.contains('@') || lowered.contains("email") {
        "Email: "
    } else if lowered.contains("linkedin") {
        "LinkedIn: "
    } else if lowered.contains("github") {
        "GitHub: "
    } else if lowered.contains("phone") || lowered.chars().filter(char::is_ascii_digit).count() >= 10
    {
        "Phone: "
    } else {
        "Website: "
    }
}

fn strip_list_marker(line: &str) -> &str {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .unwrap_or(line)
}

/// Reformat a phone number as `(555) 123-4567`, keeping any country code
fn standard_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let (country, local) = match digits.len() {
        10 => (None, digits.as_str()),
        11..=13 if raw.trim_start().starts_with('+') => {
            let (cc, local) = digits.split_at(digits.len() - 10);
            (Some(cc), local)
        }
        _ => return None,
    };
    let local = format!("({}) {}-{}", &local[..3], &local[3..6], &local[6..]);
    Some(match country {
        Some(cc) => format!("+{cc} {local}"),
        None => local,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::rules::test_support::{hits, hits_with, lines, rule};

    #[test]
    fn test_unlabeled_email() {
        let found = hits(&rule("contact-unlabeled-email"), "user@example.com");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "user@example.com");
        assert_eq!(found[0].corrected.as_deref(), Some("Email: user@example.com"));
    }

    #[test]
    fn test_labeled_contacts_pass() {
        let text = "Email: jane@example.com\nPhone: (555) 123-4567\nLinkedIn: https://linkedin.com/in/jane\n[GitHub](https://github.com/jane)";
        for id in [
            "contact-unlabeled-email",
            "contact-unlabeled-phone",
            "contact-unlabeled-url",
            "contact-url-protocol",
            "phone-format",
        ] {
            assert!(hits(&rule(id), text).is_empty(), "{id} fired");
        }
    }

    #[test]
    fn test_label_window_is_configurable() {
        let text = "Preferred contact email: jane@example.com";
        assert!(hits(&rule("contact-unlabeled-email"), text).is_empty());

        let narrow = EngineConfig {
            label_window: 5,
            ..EngineConfig::default()
        };
        let text = "Email: my personal inbox is jane@example.com";
        assert_eq!(hits_with(&rule("contact-unlabeled-email"), text, &narrow).len(), 1);
    }

    #[test]
    fn test_unlabeled_phone_and_url() {
        let text = "Jane Doe | 555-123-4567 | github.com/jane";
        let phones = hits(&rule("contact-unlabeled-phone"), text);
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].context, "Phone: 555-123-4567");

        let urls = hits(&rule("contact-unlabeled-url"), text);
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].context, "GitHub: github.com/jane");
    }

    #[test]
    fn test_obfuscated_email() {
        let found = hits(
            &rule("contact-obfuscated-email"),
            "Email: jane [at] example [dot] com\nReach me: jane(at)example.com\njane AT example DOT com",
        );
        assert_eq!(lines(&found), vec![1, 2, 3]);
        assert_eq!(found[0].matched_text, "jane [at] example [dot] com");
        assert_eq!(found[1].matched_text, "jane(at)example.com");
        assert_eq!(found[2].matched_text, "jane AT example DOT com");
    }

    #[test]
    fn test_mixed_case_domains_are_links() {
        let urls = hits(&rule("contact-unlabeled-url"), "Jane Doe | LinkedIn.com/in/jane");
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].matched_text, "LinkedIn.com/in/jane");
        assert_eq!(urls[0].context, "LinkedIn: LinkedIn.com/in/jane");

        let found = hits(&rule("contact-url-protocol"), "LinkedIn: LinkedIn.com/in/jane");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, "https://LinkedIn.com/in/jane");
    }

    #[test]
    fn test_emoji_label() {
        let found = hits(
            &rule("contact-emoji-label"),
            "📧 jane@example.com\n- 📱 Phone (555) 123-4567\n⭐ Team player",
        );
        assert_eq!(lines(&found), vec![1, 2]);
        assert_eq!(found[0].corrected.as_deref(), Some("Email: jane@example.com"));
        assert_eq!(found[1].context, "Phone:");
    }

    #[test]
    fn test_url_protocol() {
        let found = hits(&rule("contact-url-protocol"), "LinkedIn: linkedin.com/in/jane");
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].corrected.as_deref(),
            Some("LinkedIn: https://linkedin.com/in/jane")
        );
        // Unlabeled links are reported by the label rule instead
        assert!(hits(&rule("contact-url-protocol"), "linkedin.com/in/jane").is_empty());
    }

    #[test]
    fn test_phone_formats() {
        let found = hits(
            &rule("phone-format"),
            "Phone: 555.123.4567\nPhone: 5551234567\nPhone: +1-555-123-4567\nPhone: +44 (555) 123-4567",
        );
        assert_eq!(lines(&found), vec![1, 2]);
        assert_eq!(found[0].context, "(555) 123-4567");
        assert_eq!(found[1].corrected.as_deref(), Some("Phone: (555) 123-4567"));
    }

    #[test]
    fn test_standard_phone() {
        assert_eq!(standard_phone("555.123.4567").as_deref(), Some("(555) 123-4567"));
        assert_eq!(standard_phone("+1.555.123.4567").as_deref(), Some("+1 (555) 123-4567"));
        assert_eq!(standard_phone("1555123456"), Some("(155) 512-3456".to_string()));
        assert_eq!(standard_phone("123"), None);
    }
}
