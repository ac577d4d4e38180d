//! Whitespace and Unicode punctuation normalization.

use super::table::TableScanner;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Whitespace run, excluding form feeds (kept as page-break markers).
static RE_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\x0C]+").unwrap());

/// Typographic punctuation and its ASCII replacement.
const PUNCTUATION_MAPPINGS: &[(char, &str)] = &[
    ('\u{201C}', "\""),  // Left double quotation mark
    ('\u{201D}', "\""),  // Right double quotation mark
    ('\u{2018}', "'"),   // Left single quotation mark
    ('\u{2019}', "'"),   // Right single quotation mark
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "-"),   // Em dash
    ('\u{2026}', "..."), // Horizontal ellipsis
];

fn ascii_replacement(c: char) -> Option<&'static str> {
    PUNCTUATION_MAPPINGS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Collapses whitespace runs to one space and strips trailing whitespace.
///
/// Table blocks are left untouched. Leading whitespace is collapsed, not removed.
pub fn normalize_whitespace<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut scanner = TableScanner::new();
    let mut changed = 0;

    let normalized: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let line = line.as_ref();
            if scanner.is_protected(lines, idx) {
                return line.to_string();
            }
            let collapsed = RE_WHITESPACE_RUN.replace_all(line, " ");
            let cleaned = collapsed.trim_end_matches(' ').to_string();
            if cleaned != line {
                changed += 1;
            }
            cleaned
        })
        .collect();

    debug!(
        changed,
        tables = scanner.blocks().len(),
        "normalized whitespace"
    );
    normalized
}

/// Maps curly quotes, en/em dashes and ellipses to ASCII.
///
/// Operates on the whole text. Returns the text and whether anything changed.
pub fn normalize_unicode(text: &str) -> (String, bool) {
    let mut result = String::with_capacity(text.len());
    let mut replaced = 0;

    for c in text.chars() {
        match ascii_replacement(c) {
            Some(ascii) => {
                result.push_str(ascii);
                replaced += 1;
            }
            None => result.push(c),
        }
    }

    debug!(replaced, "normalized unicode punctuation");
    (result, replaced > 0)
}
