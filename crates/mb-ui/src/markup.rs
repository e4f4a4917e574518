//! # Markup
//!
//! Turns raw message text into HTML with a fixed, ordered list of
//! substitutions. The input is escaped before any substitution runs, so every
//! tag in the output comes from this module.
//!
//! Overlapping markers are resolved by order alone (bold before italic before
//! code before links before images). That can mangle adversarial input, e.g.
//! `*` inside a URL becomes `<em>` before the link is recognised. This is kept
//! as-is so existing posts render the same way.

use once_cell::sync::Lazy;
use regex::Regex;

struct Rule {
    pattern: Lazy<Regex>,
    replacement: &'static str,
}

macro_rules! rule {
    ($pattern:expr, $replacement:expr) => {
        Rule {
            pattern: Lazy::new(|| Regex::new($pattern).expect("Invalid markup pattern")),
            replacement: $replacement,
        }
    };
}

static RULES: [Rule; 6] = [
    rule!(r"(?s)\*\*(.*?)\*\*", "<strong>${1}</strong>"),
    rule!(r"(?s)\*(.*?)\*", "<em>${1}</em>"),
    rule!(r"(?s)`(.*?)`", "<code>${1}</code>"),
    rule!(
        r"\[(.*?)\]\((https?://[^\s]+)\)",
        r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#
    ),
    rule!(
        r"\[(https?://[^\s\]]+)\]",
        r#"<img src="${1}" alt="image" style="max-width:300px; border-radius:8px;">"#
    ),
    // Hard breaks; the newline itself stays in place.
    rule!(r"\r\n|\n\r|\n|\r", "<br />${0}"),
];

/// Renders raw user text as safe HTML. Never fails.
pub fn render(raw: &str) -> String {
    let mut html = html_escape::encode_quoted_attribute(raw).into_owned();
    for rule in &RULES {
        html = rule.pattern.replace_all(&html, rule.replacement).into_owned();
    }
    html
}
