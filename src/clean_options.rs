//! Options for controlling the cleaning pipeline.

use serde::{Deserialize, Serialize};

/// Share of pages a line must open or close to count as a running header/footer.
pub const DEFAULT_REPEAT_RATIO: f64 = 0.7;

/// Shortest trimmed line (in chars) eligible for running header/footer removal.
pub const DEFAULT_MIN_REPEAT_LEN: usize = 8;

/// Immutable options record passed to every cleaning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Rejoin words split by a hyphen at a line break.
    pub dehyphenate: bool,

    /// Rejoin hard-wrapped sentences into one line.
    pub merge_lines: bool,

    /// Collapse whitespace runs outside table blocks.
    pub normalize_whitespace: bool,

    /// Map curly quotes, dashes and ellipses to ASCII.
    pub normalize_unicode: bool,

    /// Remove page numbers, known header/footer phrases and running headers/footers.
    pub remove_headers: bool,

    /// Drop blank lines.
    pub remove_empty_lines: bool,

    /// Drop bare page numbers (only while `remove_headers` is set).
    pub remove_page_numbers: bool,

    /// Collapse a line that repeats the previous retained line.
    pub remove_duplicates: bool,

    /// Drop stray bullets and decorative punctuation runs.
    pub remove_punctuation_lines: bool,

    /// Keep one blank line between paragraphs instead of dropping every blank line.
    pub preserve_paragraph_spacing: bool,

    /// Page share for running header/footer inference (0.0-1.0).
    pub repeat_ratio: f64,

    /// Minimum length of an inferred running header/footer.
    pub min_repeat_len: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dehyphenate: true,
            merge_lines: true,
            normalize_whitespace: true,
            normalize_unicode: true,
            remove_headers: true,
            remove_empty_lines: true,
            remove_page_numbers: true,
            remove_duplicates: true,
            remove_punctuation_lines: true,
            preserve_paragraph_spacing: false,
            repeat_ratio: DEFAULT_REPEAT_RATIO,
            min_repeat_len: DEFAULT_MIN_REPEAT_LEN,
        }
    }
}

impl CleanOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the final line filter: no layout repair, no normalization.
    pub fn minimal() -> Self {
        Self {
            dehyphenate: false,
            merge_lines: false,
            normalize_whitespace: false,
            normalize_unicode: false,
            ..Self::default()
        }
    }

    /// Keeps line structure and headers; repairs hyphenation and whitespace only.
    pub fn conservative() -> Self {
        Self {
            merge_lines: false,
            remove_headers: false,
            ..Self::default()
        }
    }

    /// Disables dehyphenation.
    pub fn without_dehyphenation(mut self) -> Self {
        self.dehyphenate = false;
        self
    }

    /// Disables line merging.
    pub fn without_merge(mut self) -> Self {
        self.merge_lines = false;
        self
    }

    /// Disables whitespace normalization.
    pub fn without_whitespace_normalization(mut self) -> Self {
        self.normalize_whitespace = false;
        self
    }

    /// Disables Unicode punctuation normalization.
    pub fn without_unicode_normalization(mut self) -> Self {
        self.normalize_unicode = false;
        self
    }

    /// Keeps page numbers and header/footer lines.
    pub fn keep_headers(mut self) -> Self {
        self.remove_headers = false;
        self
    }

    /// Keeps blank lines.
    pub fn keep_empty_lines(mut self) -> Self {
        self.remove_empty_lines = false;
        self
    }

    /// Keeps bare page numbers while still removing other header/footer lines.
    pub fn keep_page_numbers(mut self) -> Self {
        self.remove_page_numbers = false;
        self
    }

    /// Keeps consecutive duplicate lines.
    pub fn keep_duplicates(mut self) -> Self {
        self.remove_duplicates = false;
        self
    }

    /// Keeps punctuation-only lines.
    pub fn keep_punctuation_lines(mut self) -> Self {
        self.remove_punctuation_lines = false;
        self
    }

    /// Keeps a single blank line between paragraphs.
    pub fn preserve_paragraph_spacing(mut self) -> Self {
        self.preserve_paragraph_spacing = true;
        self
    }

    /// Sets the page share used for running header/footer inference.
    ///
    /// Values are clamped to `0.0..=1.0`.
    pub fn with_repeat_ratio(mut self, ratio: f64) -> Self {
        self.repeat_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the minimum length of an inferred running header/footer.
    pub fn with_min_repeat_len(mut self, len: usize) -> Self {
        self.min_repeat_len = len;
        self
    }
}
