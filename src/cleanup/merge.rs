//! Layout repair: dehyphenation and hard-wrap merging.

use super::classify::is_list_marker;
use super::table::TableScanner;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_HYPHEN_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\n([a-z]+)").unwrap());

static RE_SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s*$").unwrap());

/// Rejoins words split by a hyphen at a line break.
///
/// Only lowercase continuations are joined; `well-\nKnown` keeps its hyphen.
/// Returns the rewritten text and the number of joins.
pub fn dehyphenate(text: &str) -> (String, usize) {
    let count = RE_HYPHEN_BREAK.find_iter(text).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    (RE_HYPHEN_BREAK.replace_all(text, "$1").into_owned(), count)
}

/// Output line plus whether it came from a table block.
struct MergedLine {
    text: String,
    protected: bool,
}

/// Rejoins hard-wrapped sentences.
///
/// A line is appended to the previous output line when both are non-blank,
/// the previous line does not end a sentence, and neither the line nor its
/// successor is a list item. Table rows pass through untouched and never
/// absorb a following line. Returns the lines and the number of merges.
pub fn merge_broken_lines<S: AsRef<str>>(lines: &[S]) -> (Vec<String>, usize) {
    let mut output: Vec<MergedLine> = Vec::with_capacity(lines.len());
    let mut scanner = TableScanner::new();
    let mut merges = 0;

    for (idx, line) in lines.iter().enumerate() {
        let current = line.as_ref();

        if scanner.is_protected(lines, idx) {
            output.push(MergedLine {
                text: current.to_string(),
                protected: true,
            });
            continue;
        }

        if let Some(prev) = output.last_mut() {
            let next_is_list = lines
                .get(idx + 1)
                .is_some_and(|next| is_list_marker(next.as_ref()));

            let mergeable = !prev.protected
                && !prev.text.trim().is_empty()
                && !current.trim().is_empty()
                && !RE_SENTENCE_END.is_match(&prev.text)
                && !is_list_marker(current)
                && !next_is_list;

            if mergeable {
                let joined_len = prev.text.trim_end().len();
                prev.text.truncate(joined_len);
                prev.text.push(' ');
                prev.text.push_str(current.trim_start());
                merges += 1;
                continue;
            }
        }

        output.push(MergedLine {
            text: current.to_string(),
            protected: false,
        });
    }

    debug!(
        merges,
        tables = scanner.blocks().len(),
        "merged hard-wrapped lines"
    );

    (output.into_iter().map(|line| line.text).collect(), merges)
}
