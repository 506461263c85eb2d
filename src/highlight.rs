//! Phone number highlighting in free text
//!
//! Finds a number however it was typed (`2104848484`, `210 484 8484`,
//! `(210) 484-8484`, `210.484.8484`, non-breaking spaces) and wraps each
//! occurrence in markup. Text is HTML-escaped first and matching runs on the
//! escaped form. A match never starts or ends next to another digit, so
//! `484` is not found inside `14840`.

use regex::Regex;

use crate::phone;

/// Characters allowed between two digits of a match: space, no-break space,
/// figure space, narrow no-break space, dash, dot and parentheses
const SEPARATORS: &str = r"[ \x{00A0}\x{2007}\x{202F}\-.()]*";

/// Escape `text` and wrap every occurrence of `target`'s digits with `markup`.
///
/// `markup` receives the matched span exactly as it appears in the escaped
/// text, separators included. Empty text or a target without digits returns
/// the escaped text untouched.
pub fn highlight<F>(text: &str, target: &str, markup: F) -> String
where
    F: Fn(&str) -> String,
{
    let escaped = escape(text);
    let digits = phone::normalize(target);
    if escaped.is_empty() || digits.is_empty() {
        return escaped;
    }

    let re = match Regex::new(&flexible_pattern(&digits)) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Could not build highlight pattern for {}: {}", digits, e);
            return escaped;
        }
    };

    let mut out = String::with_capacity(escaped.len() + 32);
    let mut copied = 0;
    let mut pos = 0;
    while let Some(m) = re.find_at(&escaped, pos) {
        if clear_of_digits(&escaped, m.start(), m.end()) {
            out.push_str(&escaped[copied..m.start()]);
            out.push_str(&markup(m.as_str()));
            copied = m.end();
            pos = m.end();
        } else {
            // A later start may still produce a clean match
            pos = m.start() + escaped[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }
    out.push_str(&escaped[copied..]);
    out
}

/// Bold colored span, the style used on caller cards
pub fn emphasis(color: &str) -> impl Fn(&str) -> String {
    let color = html_escape::encode_single_quoted_attribute(color).into_owned();
    move |matched: &str| format!("<span style='color:{}; font-weight:bold;'>{}</span>", color, matched)
}

/// Escape markup-reserved characters (`&`, `<`, `>`).
///
/// Quotes are left alone so no numeric entity (and therefore no digit) is
/// introduced into the text being searched.
pub fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Digits of the target in order, separators allowed between them
fn flexible_pattern(digits: &str) -> String {
    let parts: Vec<String> = digits.chars().map(String::from).collect();
    parts.join(SEPARATORS)
}

/// Neither the character before `start` nor the one at `end` is a digit
fn clear_of_digits(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}
