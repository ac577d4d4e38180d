//! # Cleaning Pipeline
//!
//! Turns raw extracted text into normalized prose.
//!
//! ## Pipeline Stages
//!
//! 1. **Dehyphenation** - rejoin `docu-\nment` style breaks
//! 2. **Line Merging** - rejoin hard-wrapped sentences, sparing lists and tables
//! 3. **Whitespace Normalization** - collapse runs outside table blocks
//! 4. **Unicode Normalization** - curly quotes, dashes and ellipses to ASCII
//! 5. **Page Analysis** - page boundaries and running header/footer inference
//! 6. **Line Filter** - drop blank, decorative, page-number, header/footer and
//!    duplicate lines
//!
//! The order is fixed: merging needs the dehyphenated text, and page analysis
//! runs on the fully normalized lines that the filter will see.

pub mod classify;
pub mod merge;
pub mod normalize;
pub mod pages;
pub mod stats;
pub mod table;

pub use classify::{
    is_list_marker, is_page_number, is_punctuation_only, CatalogEntry, HeaderCatalog,
    LineClassifier, LineKind,
};
pub use stats::CleanStats;

use crate::clean_options::CleanOptions;
use pages::{detect_page_boundaries, infer_repeating_lines, RepeatPolicy};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Why the final filter dropped a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    Empty,
    PunctuationOnly,
    PageNumber,
    KnownHeaderFooter,
    RepeatingHeaderFooter,
    Duplicate,
}

impl RemovalReason {
    /// Maps a line tag to a removal, honoring the per-category switches.
    fn from_kind(kind: LineKind, options: &CleanOptions) -> Option<Self> {
        let headers = options.remove_headers;
        match kind {
            LineKind::Blank if options.remove_empty_lines => Some(Self::Empty),
            LineKind::DecorativePunctuation if options.remove_punctuation_lines => {
                Some(Self::PunctuationOnly)
            }
            LineKind::PageNumber if headers && options.remove_page_numbers => {
                Some(Self::PageNumber)
            }
            LineKind::KnownHeaderFooter if headers => Some(Self::KnownHeaderFooter),
            LineKind::RepeatingHeaderFooter if headers => Some(Self::RepeatingHeaderFooter),
            _ => None,
        }
    }

    /// Counter incremented for this reason. Page numbers count as headers/footers.
    fn counter(self, stats: &mut CleanStats) -> &mut usize {
        match self {
            Self::Empty => &mut stats.empty_lines_removed,
            Self::PunctuationOnly => &mut stats.punctuation_lines_removed,
            Self::PageNumber | Self::KnownHeaderFooter => &mut stats.header_footer_removed,
            Self::RepeatingHeaderFooter => &mut stats.repeating_headers_footers_removed,
            Self::Duplicate => &mut stats.duplicates_collapsed,
        }
    }
}

/// Cleaned text plus the counters describing what was changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanOutput {
    pub text: String,
    pub stats: CleanStats,
}

/// Cleaning pipeline bound to options and a header/footer catalog.
///
/// # Example
///
/// ```
/// use docstrip::{CleanOptions, Cleaner};
///
/// let cleaner = Cleaner::new(CleanOptions::default());
/// let output = cleaner.clean("Page 1\n\nHello world\nthis is fine.\n\n3\n");
/// assert_eq!(output.text, "Hello world this is fine.");
/// assert_eq!(output.stats.merged_lines, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    options: CleanOptions,
    catalog: HeaderCatalog,
}

impl Cleaner {
    /// Creates a cleaner using the built-in header/footer catalog.
    pub fn new(options: CleanOptions) -> Self {
        Self {
            options,
            catalog: HeaderCatalog::default(),
        }
    }

    /// Replaces the header/footer catalog.
    pub fn with_catalog(mut self, catalog: HeaderCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Options in use.
    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Header/footer catalog in use.
    pub fn catalog(&self) -> &HeaderCatalog {
        &self.catalog
    }

    /// Runs the full pipeline on one document.
    pub fn clean(&self, text: &str) -> CleanOutput {
        run_pipeline(text, &self.options, &self.catalog)
    }
}

/// Runs the full pipeline with the built-in catalog.
///
/// Empty input yields empty output and all-zero statistics.
pub fn clean(text: &str, options: &CleanOptions) -> CleanOutput {
    run_pipeline(text, options, HeaderCatalog::builtin())
}

fn run_pipeline(text: &str, options: &CleanOptions, catalog: &HeaderCatalog) -> CleanOutput {
    if text.is_empty() {
        return CleanOutput::default();
    }

    let mut stats = CleanStats::default();

    let text = if options.dehyphenate {
        let (text, fixed) = merge::dehyphenate(text);
        stats.dehyphenated_tokens = fixed;
        text
    } else {
        text.to_string()
    };

    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();

    if options.merge_lines {
        let (merged, count) = merge::merge_broken_lines(&lines);
        stats.merged_lines = count;
        lines = merged;
    }

    if options.normalize_whitespace {
        lines = normalize::normalize_whitespace(&lines);
    }

    if options.normalize_unicode {
        let (normalized, changed) = normalize::normalize_unicode(&lines.join("\n"));
        if changed {
            lines = normalized.split('\n').map(str::to_string).collect();
        }
    }

    let classifier = LineClassifier::new(catalog);
    let repeating = if options.remove_headers {
        find_repeating_lines(&lines, &classifier, options)
    } else {
        HashSet::new()
    };
    let classifier = classifier.with_repeating(&repeating);

    let (kept, stats) = filter_lines(lines, &classifier, options, stats);
    CleanOutput {
        text: kept.join("\n"),
        stats,
    }
}

fn find_repeating_lines(
    lines: &[String],
    classifier: &LineClassifier<'_>,
    options: &CleanOptions,
) -> HashSet<String> {
    let boundaries = detect_page_boundaries(lines);
    let policy = RepeatPolicy {
        ratio: options.repeat_ratio,
        min_len: options.min_repeat_len,
    };
    let repeating = infer_repeating_lines(lines, &boundaries, classifier, policy);

    debug!(
        pages = boundaries.page_count(),
        source = ?boundaries.source,
        repeating = repeating.len(),
        "analyzed page structure"
    );
    repeating
}

/// Final pass: keeps a line unless a removal rule claims it.
///
/// Form feeds have served page detection by now and are stripped from
/// retained lines.
fn filter_lines(
    lines: Vec<String>,
    classifier: &LineClassifier<'_>,
    options: &CleanOptions,
    mut stats: CleanStats,
) -> (Vec<String>, CleanStats) {
    let total = lines.len();
    let mut kept: Vec<String> = Vec::with_capacity(total);
    let spacing = options.remove_empty_lines && options.preserve_paragraph_spacing;

    for line in lines {
        let kind = classifier.classify(&line);
        let reason = match kind {
            // One blank line survives after retained content; runs collapse.
            LineKind::Blank if spacing => kept
                .last()
                .map_or(true, |prev| prev.trim().is_empty())
                .then_some(RemovalReason::Empty),
            LineKind::Blank => RemovalReason::from_kind(kind, options),
            _ => RemovalReason::from_kind(kind, options).or_else(|| {
                kept.last()
                    .filter(|prev| options.remove_duplicates && prev.trim() == line.trim())
                    .map(|_| RemovalReason::Duplicate)
            }),
        };

        match reason {
            Some(reason) => {
                if reason == RemovalReason::KnownHeaderFooter {
                    debug!(
                        line = line.trim(),
                        entry = classifier
                            .catalog()
                            .matching_entry(&line)
                            .map(|entry| entry.description.as_str()),
                        "removed known header/footer"
                    );
                }
                *reason.counter(&mut stats) += 1;
            }
            None if line.contains('\u{0C}') => kept.push(line.replace('\u{0C}', "")),
            None => kept.push(line),
        }
    }

    // A paragraph gap is only kept between two retained lines.
    if spacing {
        while kept.last().is_some_and(|line| line.trim().is_empty()) {
            kept.pop();
            stats.empty_lines_removed += 1;
        }
    }

    stats.lines_removed = total - kept.len();
    debug!(total, kept = kept.len(), "filtered lines");

    (kept, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_only() -> CleanOptions {
        CleanOptions::minimal()
    }

    #[test]
    fn test_empty_input() {
        let output = clean("", &CleanOptions::default());
        assert_eq!(output.text, "");
        assert!(output.stats.is_empty());
    }

    #[test]
    fn test_dehyphenation() {
        let output = clean("auto-\nmatic", &CleanOptions::default());
        assert_eq!(output.text.trim(), "automatic");
        assert!(output.stats.dehyphenated_tokens >= 1);
    }

    #[test]
    fn test_merge() {
        let options = CleanOptions::default().without_unicode_normalization();
        let output = clean("Hello world\nthis is fine.", &options);
        assert!(output.text.starts_with("Hello world this"));
        assert!(output.stats.merged_lines >= 1);
    }

    #[test]
    fn test_removes_page_numbers_and_headers() {
        let output = clean("Page 1\nCONFIDENTIAL\nContent line\n1\n", &filter_only());
        assert_eq!(output.text, "Content line");
        assert_eq!(output.stats.header_footer_removed, 3);
        assert_eq!(output.stats.empty_lines_removed, 1);
        assert_eq!(output.stats.lines_removed, 4);
    }

    #[test]
    fn test_keeps_headers_when_disabled() {
        let output = clean("Page 2\nContent", &filter_only().keep_headers());
        assert_eq!(output.text, "Page 2\nContent");
        assert_eq!(output.stats.header_footer_removed, 0);
    }

    #[test]
    fn test_punctuation_lines() {
        let output = clean("Intro.\n-----\n•\nBody.", &filter_only());
        assert_eq!(output.text, "Intro.\nBody.");
        assert_eq!(output.stats.punctuation_lines_removed, 2);
    }

    #[test]
    fn test_duplicate_compares_with_retained_line() {
        // The page number between the copies is removed, so they become adjacent.
        let output = clean("Same line.\n7\nSame line.\nOther.", &filter_only());
        assert_eq!(output.text, "Same line.\nOther.");
        assert_eq!(output.stats.duplicates_collapsed, 1);
        assert_eq!(output.stats.header_footer_removed, 1);
    }

    #[test]
    fn test_duplicate_is_trim_equal() {
        let output = clean("  Twice.\nTwice.  ", &filter_only());
        assert_eq!(output.text, "  Twice.");
        assert_eq!(output.stats.duplicates_collapsed, 1);
    }

    #[test]
    fn test_line_accounting() {
        let input = "Page 1\n\n***\nReport body.\nReport body.\n12\n\n";
        let output = clean(input, &filter_only());
        let input_lines = input.split('\n').count();
        let kept_lines = output.text.split('\n').count();
        assert_eq!(output.stats.lines_removed, input_lines - kept_lines);
        assert_eq!(output.stats.categorized_removals(), output.stats.lines_removed);
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = HeaderCatalog::from_json(r#"[{"pattern": "Seite \\d+"}]"#).unwrap();
        let cleaner = Cleaner::new(filter_only()).with_catalog(catalog);
        let output = cleaner.clean("Seite 4\nInhalt.\nCONFIDENTIAL");
        assert_eq!(output.text, "Inhalt.\nCONFIDENTIAL");
        assert_eq!(output.stats.header_footer_removed, 1);
    }

    #[test]
    fn test_removal_reason_respects_switches() {
        let defaults = CleanOptions::default();
        let headers_kept = CleanOptions::default().keep_headers();

        assert_eq!(RemovalReason::from_kind(LineKind::PageNumber, &headers_kept), None);
        assert_eq!(
            RemovalReason::from_kind(LineKind::Blank, &headers_kept),
            Some(RemovalReason::Empty)
        );
        assert_eq!(
            RemovalReason::from_kind(LineKind::RepeatingHeaderFooter, &defaults),
            Some(RemovalReason::RepeatingHeaderFooter)
        );
        assert_eq!(RemovalReason::from_kind(LineKind::ListItem, &defaults), None);

        let page_numbers_kept = CleanOptions::default().keep_page_numbers();
        assert_eq!(
            RemovalReason::from_kind(LineKind::PageNumber, &page_numbers_kept),
            None
        );
        assert_eq!(
            RemovalReason::from_kind(LineKind::KnownHeaderFooter, &page_numbers_kept),
            Some(RemovalReason::KnownHeaderFooter)
        );
        assert_eq!(
            RemovalReason::from_kind(
                LineKind::DecorativePunctuation,
                &CleanOptions::default().keep_punctuation_lines()
            ),
            None
        );
    }

    #[test]
    fn test_category_switches() {
        let input = "Intro.\n\n-----\n4\nCONFIDENTIAL\nIntro.\nIntro.";
        let options = filter_only()
            .keep_empty_lines()
            .keep_punctuation_lines()
            .keep_page_numbers()
            .keep_duplicates();
        let output = clean(input, &options);

        assert_eq!(output.text, "Intro.\n\n-----\n4\nIntro.\nIntro.");
        assert_eq!(output.stats.header_footer_removed, 1);
        assert_eq!(output.stats.lines_removed, 1);
        assert_eq!(output.stats.categorized_removals(), output.stats.lines_removed);
    }

    #[test]
    fn test_kept_blank_lines_are_not_collapsed_as_duplicates() {
        let output = clean("a.\n\n\nb.", &filter_only().keep_empty_lines());
        assert_eq!(output.text, "a.\n\n\nb.");
        assert_eq!(output.stats.duplicates_collapsed, 0);
    }

    #[test]
    fn test_preserve_paragraph_spacing() {
        let input = "\n\nFirst paragraph.\n\n\nSecond paragraph.\n\nPage 2\n\nThird.\n\n";
        let options = filter_only().preserve_paragraph_spacing();
        let output = clean(input, &options);

        assert_eq!(
            output.text,
            "First paragraph.\n\nSecond paragraph.\n\nThird."
        );
        assert_eq!(output.stats.header_footer_removed, 1);
        assert_eq!(
            output.stats.lines_removed,
            input.split('\n').count() - output.text.split('\n').count()
        );
        assert_eq!(output.stats.categorized_removals(), output.stats.lines_removed);

        // Idempotent once the gaps are single blank lines.
        assert_eq!(clean(&output.text, &options).text, output.text);
    }

    #[test]
    fn test_form_feeds_do_not_reach_output() {
        let input = "Alpha.\n\u{0C}Beta.\n\u{0C}Gamma.";
        for options in [CleanOptions::default(), filter_only()] {
            let output = clean(input, &options);
            assert_eq!(output.text, "Alpha.\nBeta.\nGamma.");
        }
    }
}
