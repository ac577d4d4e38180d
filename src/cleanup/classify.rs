//! Line classification: pure, whole-line predicates over a trimmed line.
//!
//! The known header/footer phrases live in a [`HeaderCatalog`], an ordered
//! data table of `(pattern, description)` entries that can be replaced or
//! loaded from JSON without touching the predicates.

use crate::error::{Error, Result};
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Longest line (in chars) still treated as a decorative punctuation line.
const MAX_PUNCTUATION_LEN: usize = 50;

static RE_PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\s*$").unwrap());

static RE_STRAY_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•·*‣◦▪]\s*$").unwrap());

static RE_PUNCTUATION_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\w\s]+$").unwrap());

static RE_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-•*·‣◦▪]\s+|\d+[.)]\s+)").unwrap());

/// Built-in header/footer phrases, matched case-insensitively against the whole line.
const DEFAULT_HEADER_PATTERNS: &[(&str, &str)] = &[
    (r"Page\s+\d+\s+of\s+\d+", "page label with total"),
    (r"\d+\s+of\s+\d+", "bare page ratio"),
    (r"Page\s+\d+", "page label"),
    (r"Página\s+\d+\s+de\s+\d+", "page label (Spanish/Portuguese)"),
    (r"Страница\s+\d+\s+из\s+\d+", "page label (Russian)"),
    (r"Confidential", "classification marking"),
    (r"Draft", "draft marking"),
    (r"Internal", "classification marking"),
    (r"Private", "classification marking"),
    (r"Restricted", "classification marking"),
    (r"Classified", "classification marking"),
    (r"Proprietary", "classification marking"),
    (r"Strictly\s+Confidential", "classification marking"),
    (r"Top\s+Secret", "classification marking"),
    (r"Proprietary\s+and\s+Confidential", "classification marking"),
    (r"Confidential\s*-\s*Internal\s+Use\s+Only", "compound classification marking"),
    (r"Draft\s*-\s*Not\s+for\s+Distribution", "compound draft marking"),
    (r"Internal\s+Use\s+Only", "distribution marking"),
    (r"For\s+Internal\s+Use(?:\s+Only)?", "distribution marking"),
    (r"Do\s+Not\s+Distribute", "distribution marking"),
];

static BUILTIN_CATALOG: LazyLock<HeaderCatalog> = LazyLock::new(|| {
    let entries = DEFAULT_HEADER_PATTERNS
        .iter()
        .map(|(pattern, description)| CatalogEntry::new(*pattern, *description))
        .collect();
    HeaderCatalog::new(entries).unwrap()
});

/// True iff the line is only digits, optionally surrounded by spaces.
pub fn is_page_number(line: &str) -> bool {
    RE_PAGE_NUMBER.is_match(line.trim())
}

/// True iff the line is a stray bullet glyph or a short run of punctuation.
pub fn is_punctuation_only(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if RE_STRAY_BULLET.is_match(trimmed) {
        return true;
    }
    RE_PUNCTUATION_ONLY.is_match(trimmed) && trimmed.chars().count() <= MAX_PUNCTUATION_LEN
}

/// True iff the line opens with a bullet or an ordinal (`1.`, `2)`) followed by whitespace.
pub fn is_list_marker(line: &str) -> bool {
    RE_LIST_MARKER.is_match(line.trim())
}

/// One known header/footer phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Regular expression for the whole trimmed line (anchors are added).
    pub pattern: String,
    /// Human-readable label, logged at debug level when the entry removes a line.
    #[serde(default)]
    pub description: String,
}

impl CatalogEntry {
    /// Creates a new catalog entry.
    pub fn new(pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
        }
    }
}

/// Ordered catalog of known header/footer phrases.
#[derive(Debug, Clone)]
pub struct HeaderCatalog {
    entries: Vec<CatalogEntry>,
    set: RegexSet,
}

impl HeaderCatalog {
    /// Compiles a catalog from entries.
    ///
    /// Each pattern is matched case-insensitively against the whole line.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut anchored = Vec::with_capacity(entries.len());
        for entry in &entries {
            let pattern = format!(r"(?i)^(?:{})$", entry.pattern);
            // Compile individually so the error names the offending entry.
            Regex::new(&pattern).map_err(|e| Error::InvalidPattern {
                pattern: entry.pattern.clone(),
                message: e.to_string(),
            })?;
            anchored.push(pattern);
        }

        let set = RegexSet::new(&anchored).map_err(|e| Error::InvalidPattern {
            pattern: String::from("<catalog>"),
            message: e.to_string(),
        })?;

        Ok(Self { entries, set })
    }

    /// Returns the built-in catalog.
    pub fn builtin() -> &'static HeaderCatalog {
        &BUILTIN_CATALOG
    }

    /// Parses a catalog from a JSON array of `{"pattern", "description"}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Loads a JSON catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns a new catalog with extra entries appended after the existing ones.
    pub fn extended(&self, extra: Vec<CatalogEntry>) -> Result<Self> {
        let mut entries = self.entries.clone();
        entries.extend(extra);
        Self::new(entries)
    }

    /// Catalog entries in priority order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff the trimmed line matches any known header/footer phrase.
    pub fn is_header_footer(&self, line: &str) -> bool {
        self.set.is_match(line.trim())
    }

    /// First entry matching the trimmed line.
    pub fn matching_entry(&self, line: &str) -> Option<&CatalogEntry> {
        self.set
            .matches(line.trim())
            .iter()
            .next()
            .map(|idx| &self.entries[idx])
    }
}

impl Default for HeaderCatalog {
    fn default() -> Self {
        BUILTIN_CATALOG.clone()
    }
}

/// Derived tag for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// Stray bullet or a short run of punctuation (`-----`, `***`).
    DecorativePunctuation,
    /// Bare page number.
    PageNumber,
    /// Matches the header/footer catalog.
    KnownHeaderFooter,
    /// Inferred running header/footer for this document.
    RepeatingHeaderFooter,
    /// Bullet or numbered list item.
    ListItem,
    /// Anything else.
    Content,
}

type Rule = fn(&LineClassifier<'_>, &str) -> bool;

/// Classification rules in priority order; the first match wins.
const RULES: &[(LineKind, Rule)] = &[
    (LineKind::Blank, rule_blank),
    (LineKind::DecorativePunctuation, rule_punctuation),
    (LineKind::PageNumber, rule_page_number),
    (LineKind::KnownHeaderFooter, rule_known_header),
    (LineKind::RepeatingHeaderFooter, rule_repeating),
    (LineKind::ListItem, rule_list_item),
];

fn rule_blank(_: &LineClassifier<'_>, line: &str) -> bool {
    line.is_empty()
}

fn rule_punctuation(_: &LineClassifier<'_>, line: &str) -> bool {
    is_punctuation_only(line)
}

fn rule_page_number(_: &LineClassifier<'_>, line: &str) -> bool {
    is_page_number(line)
}

fn rule_known_header(classifier: &LineClassifier<'_>, line: &str) -> bool {
    classifier.catalog.is_header_footer(line)
}

fn rule_repeating(classifier: &LineClassifier<'_>, line: &str) -> bool {
    classifier
        .repeating
        .is_some_and(|repeating| repeating.contains(line))
}

fn rule_list_item(_: &LineClassifier<'_>, line: &str) -> bool {
    is_list_marker(line)
}

/// Classifies lines against a catalog and, optionally, an inferred running-header set.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'a> {
    catalog: &'a HeaderCatalog,
    repeating: Option<&'a HashSet<String>>,
}

impl<'a> LineClassifier<'a> {
    /// Creates a classifier without running-header knowledge.
    pub fn new(catalog: &'a HeaderCatalog) -> Self {
        Self {
            catalog,
            repeating: None,
        }
    }

    /// Adds the inferred running header/footer set.
    pub fn with_repeating(mut self, repeating: &'a HashSet<String>) -> Self {
        self.repeating = Some(repeating);
        self
    }

    /// The header/footer catalog in use.
    pub fn catalog(&self) -> &'a HeaderCatalog {
        self.catalog
    }

    /// Tags a line. Deterministic and side-effect free.
    pub fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        RULES
            .iter()
            .find(|(_, rule)| rule(self, trimmed))
            .map(|(kind, _)| *kind)
            .unwrap_or(LineKind::Content)
    }

    /// True for lines already handled by the fixed predicates (catalog phrase or page number).
    pub fn is_fixed_noise(&self, line: &str) -> bool {
        is_page_number(line) || self.catalog.is_header_footer(line)
    }
}
