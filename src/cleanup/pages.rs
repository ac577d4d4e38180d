//! Page boundary detection and running header/footer inference.

use super::classify::LineClassifier;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static RE_PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Page\s+\d+(?:\s+of\s+\d+)?$").unwrap());

/// Blank lines that, in a row, are read as a page break.
const MIN_BLANK_RUN: usize = 3;

/// How page boundaries were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundarySource {
    /// Lines carrying a form feed.
    FormFeed,
    /// Explicit "Page N" / "Page N of M" lines.
    PageMarkers,
    /// Runs of blank lines.
    BlankRuns,
}

/// Line indices where a new page starts.
///
/// Lines before the first boundary form page one, which may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBoundaries {
    pub source: BoundarySource,
    pub starts: Vec<usize>,
}

impl PageBoundaries {
    /// Number of logical pages.
    pub fn page_count(&self) -> usize {
        self.starts.len() + 1
    }

    /// Line ranges of every page over a sequence of `line_count` lines.
    pub fn page_ranges(&self, line_count: usize) -> Vec<(usize, usize)> {
        let mut ranges = Vec::with_capacity(self.page_count());
        let mut start = 0;
        for &boundary in &self.starts {
            let end = boundary.min(line_count);
            ranges.push((start, end));
            start = end;
        }
        ranges.push((start, line_count));
        ranges
    }
}

/// Partitions lines into logical pages.
///
/// Fallback chain: form feeds, then at least two page markers (all but the
/// first become boundaries), then runs of three or more blank lines.
pub fn detect_page_boundaries<S: AsRef<str>>(lines: &[S]) -> PageBoundaries {
    // Every form feed line counts, including line 0 (an empty leading page).
    let form_feeds: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.as_ref().contains('\u{0C}'))
        .map(|(idx, _)| idx)
        .collect();
    if !form_feeds.is_empty() {
        return PageBoundaries {
            source: BoundarySource::FormFeed,
            starts: form_feeds,
        };
    }

    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| RE_PAGE_MARKER.is_match(line.as_ref().trim()))
        .map(|(idx, _)| idx)
        .collect();
    if markers.len() > 1 {
        return PageBoundaries {
            source: BoundarySource::PageMarkers,
            starts: markers[1..].to_vec(),
        };
    }

    let mut starts = Vec::new();
    let mut blank_run = 0;
    for (idx, line) in lines.iter().enumerate() {
        if line.as_ref().trim().is_empty() {
            blank_run += 1;
        } else {
            if blank_run >= MIN_BLANK_RUN {
                starts.push(idx);
            }
            blank_run = 0;
        }
    }

    PageBoundaries {
        source: BoundarySource::BlankRuns,
        starts,
    }
}

/// Settings for running header/footer inference.
#[derive(Debug, Clone, Copy)]
pub struct RepeatPolicy {
    /// Share of pages a line must appear on.
    pub ratio: f64,
    /// Minimum trimmed length in chars.
    pub min_len: usize,
}

impl RepeatPolicy {
    /// Occurrences needed for `page_count` pages, never below one.
    pub fn threshold(&self, page_count: usize) -> usize {
        ((page_count as f64 * self.ratio).floor() as usize).max(1)
    }
}

/// Finds lines that open or close most pages.
///
/// Lines that are already catalog phrases or page numbers are skipped when
/// picking each page's first and last content line. With fewer than two pages
/// there is no evidence and the set is empty.
pub fn infer_repeating_lines<S: AsRef<str>>(
    lines: &[S],
    boundaries: &PageBoundaries,
    classifier: &LineClassifier<'_>,
    policy: RepeatPolicy,
) -> HashSet<String> {
    let page_count = boundaries.page_count();
    if page_count < 2 {
        return HashSet::new();
    }

    let mut first_lines: HashMap<&str, usize> = HashMap::new();
    let mut last_lines: HashMap<&str, usize> = HashMap::new();

    let is_candidate =
        |line: &str| !line.is_empty() && !classifier.is_fixed_noise(line);

    for (start, end) in boundaries.page_ranges(lines.len()) {
        let page = &lines[start..end];

        if let Some(first) = page
            .iter()
            .map(|line| line.as_ref().trim())
            .find(|line| is_candidate(line))
        {
            *first_lines.entry(first).or_insert(0) += 1;
        }

        if let Some(last) = page
            .iter()
            .rev()
            .map(|line| line.as_ref().trim())
            .find(|line| is_candidate(line))
        {
            *last_lines.entry(last).or_insert(0) += 1;
        }
    }

    let threshold = policy.threshold(page_count);
    first_lines
        .into_iter()
        .chain(last_lines)
        .filter(|(line, count)| *count >= threshold && line.chars().count() >= policy.min_len)
        .map(|(line, _)| line.to_string())
        .collect()
}
