//! # docstrip
//!
//! Heuristic noise remover for text extracted from documents.
//!
//! Strips page headers and footers, page numbers, decorative punctuation
//! lines and duplicated lines, and repairs layout damage (hyphenation breaks,
//! hard-wrapped sentences) while leaving lists and tables alone.
//!
//! ## Supported Inputs
//!
//! - **Plain text**: UTF-8, with a Latin-1 fallback
//! - **DOCX**: paragraph text from `word/document.xml` (with `docx` feature)
//! - **PDF**: through poppler's `pdftotext -layout`, if installed
//!
//! ## Quick Start
//!
//! ```
//! use docstrip::{clean, CleanOptions};
//!
//! let raw = "Page 1\n\nThe quarterly re-\nsults were strong.\n\n-----\n\n3\n";
//! let output = clean(raw, &CleanOptions::default());
//!
//! assert_eq!(output.text, "The quarterly results were strong.");
//! assert_eq!(output.stats.dehyphenated_tokens, 1);
//! ```
//!
//! ## Features
//!
//! - `docx` (default): DOCX extraction
//! - `async`: Async I/O support with Tokio

pub mod batch;
pub mod clean_options;
pub mod cleanup;
pub mod detect;
pub mod error;
pub mod extract;
pub mod history;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use clean_options::CleanOptions;
pub use cleanup::{clean, CatalogEntry, CleanOutput, CleanStats, Cleaner, HeaderCatalog, LineKind};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use history::{History, OperationRecord, RunEntry, RunStats, UndoReport};

use std::path::{Path, PathBuf};
use tracing::info;

/// Extracts a file and cleans its text.
///
/// # Example
///
/// ```no_run
/// use docstrip::{clean_file, CleanOptions};
///
/// let output = clean_file("scan.pdf", &CleanOptions::default())?;
/// println!("{}", output.text);
/// # Ok::<(), docstrip::Error>(())
/// ```
pub fn clean_file(path: impl AsRef<Path>, options: &CleanOptions) -> Result<CleanOutput> {
    let text = extract::read_document(path)?;
    Ok(clean(&text, options))
}

/// Where the cleaned text of `source` is written.
///
/// Text files are cleaned in place; DOCX and PDF sources get a sibling
/// `<name>.txt` so the original container is never overwritten.
pub fn output_path(source: impl AsRef<Path>, format: FormatType) -> PathBuf {
    let source = source.as_ref();
    match format {
        FormatType::PlainText => source.to_path_buf(),
        FormatType::Docx | FormatType::Pdf => {
            let mut name = source.file_name().map(|n| n.to_os_string()).unwrap_or_default();
            name.push(".");
            name.push(FormatType::PlainText.extension());
            source.with_file_name(name)
        }
    }
}

/// Builder for cleaning files on disk with backups and an undo log.
///
/// # Example
///
/// ```no_run
/// use docstrip::{CleanOptions, DocStripper};
///
/// let stripper = DocStripper::new()
///     .with_options(CleanOptions::conservative())
///     .with_log_file("cleanup-log.json");
///
/// let document = stripper.process("notes.txt")?;
/// println!("removed {} lines", document.output.stats.lines_removed);
/// stripper.record_run(&[document])?;
/// # Ok::<(), docstrip::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocStripper {
    cleaner: Cleaner,
    history: History,
    dry_run: bool,
}

impl DocStripper {
    /// Creates a builder with default options, the built-in catalog and `.strip-log`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cleaning options, keeping the current catalog.
    pub fn with_options(mut self, options: CleanOptions) -> Self {
        let catalog = self.cleaner.catalog().clone();
        self.cleaner = Cleaner::new(options).with_catalog(catalog);
        self
    }

    /// Replaces the header/footer catalog.
    pub fn with_catalog(mut self, catalog: HeaderCatalog) -> Self {
        self.cleaner = self.cleaner.with_catalog(catalog);
        self
    }

    /// Adds the patterns of a JSON catalog file to the current catalog.
    pub fn with_patterns_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let extra = HeaderCatalog::load(path)?;
        let catalog = self.cleaner.catalog().extended(extra.entries().to_vec())?;
        Ok(self.with_catalog(catalog))
    }

    /// Sets the undo log location.
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history = History::new(path);
        self
    }

    /// Reports changes without writing files or the log.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn cleaner(&self) -> &Cleaner {
        &self.cleaner
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Extracts and cleans one file, then writes the result unless in dry-run mode.
    pub fn process(&self, path: impl AsRef<Path>) -> Result<ProcessedDocument> {
        let source = path.as_ref();
        let format = detect_format_from_path(source)?;
        let original = extract::read_document_as(source, format)?;
        let output = self.cleaner.clean(&original);
        let target = output_path(source, format);

        let record = if self.dry_run {
            None
        } else {
            Some(history::write_with_backup(&target, &output.text, output.stats)?)
        };

        info!(
            source = %source.display(),
            target = %target.display(),
            lines_removed = output.stats.lines_removed,
            dry_run = self.dry_run,
            "processed document"
        );

        Ok(ProcessedDocument {
            source: source.to_path_buf(),
            target,
            format,
            changed: original != output.text,
            output,
            record,
        })
    }

    /// Appends the written files of a run to the undo log and returns the run totals.
    pub fn record_run(&self, documents: &[ProcessedDocument]) -> Result<RunStats> {
        let stats = RunStats {
            files_processed: documents.len(),
            totals: documents.iter().map(|d| d.output.stats).sum(),
        };

        if !self.dry_run {
            let operations = documents.iter().filter_map(|d| d.record.clone()).collect();
            self.history.append_run(operations, stats)?;
        }

        Ok(stats)
    }

    /// Rolls back the most recent recorded run.
    pub fn undo(&self) -> Result<UndoReport> {
        self.history.undo_last()
    }
}

/// A cleaned file.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub source: PathBuf,
    /// File that receives (or would receive) the cleaned text.
    pub target: PathBuf,
    pub format: FormatType,
    /// Whether cleaning changed the extracted text.
    pub changed: bool,
    pub output: CleanOutput,
    /// Written file and its backup; `None` in dry-run mode.
    pub record: Option<OperationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path("notes.txt", FormatType::PlainText),
            PathBuf::from("notes.txt")
        );
        assert_eq!(
            output_path("in/report.docx", FormatType::Docx),
            PathBuf::from("in/report.docx.txt")
        );
        assert_eq!(
            output_path("scan.pdf", FormatType::Pdf),
            PathBuf::from("scan.pdf.txt")
        );
    }

    #[test]
    fn test_dry_run_leaves_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("draft.txt");
        std::fs::write(&file, "Body.\n\n\n2").unwrap();

        let stripper = DocStripper::new()
            .with_log_file(dir.path().join("log"))
            .dry_run(true);
        assert!(stripper.is_dry_run());
        let document = stripper.process(&file).unwrap();

        assert!(document.changed);
        assert!(document.record.is_none());
        assert_eq!(document.output.text, "Body.");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "Body.\n\n\n2");

        let stats = stripper.record_run(&[document]).unwrap();
        assert_eq!(stats.files_processed, 1);
        assert!(!dir.path().join("log").exists());
        assert!(!history::backup_path(&file).exists());
    }

    #[test]
    fn test_with_options_keeps_catalog() {
        let catalog = HeaderCatalog::new(vec![CatalogEntry::new("Seite \\d+", "")]).unwrap();
        let stripper = DocStripper::new()
            .with_catalog(catalog)
            .with_options(CleanOptions::minimal());
        assert_eq!(stripper.cleaner().catalog().len(), 1);
        assert!(!stripper.cleaner().options().merge_lines);
    }

    #[test]
    fn test_patterns_file_extends_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = dir.path().join("patterns.json");
        std::fs::write(&patterns, r#"[{"pattern": "ACME Corp\\. Annual Review"}]"#).unwrap();

        let stripper = DocStripper::new().with_patterns_file(&patterns).unwrap();
        let catalog = stripper.cleaner().catalog();
        assert_eq!(catalog.len(), HeaderCatalog::builtin().len() + 1);
        assert!(catalog.is_header_footer("acme corp. annual review"));
        assert!(catalog.is_header_footer("CONFIDENTIAL"));
    }

    #[test]
    fn test_unsupported_file_is_an_error() {
        assert!(matches!(
            DocStripper::new().process("slides.odp"),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
