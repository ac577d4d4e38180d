//! Parallel cleaning of independent documents.

use crate::cleanup::{CleanOutput, CleanStats, Cleaner};
use crate::error::Result;
use crate::extract::read_document;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome for one input file.
#[derive(Debug)]
pub struct DocumentResult {
    pub path: PathBuf,
    pub outcome: Result<CleanOutput>,
}

impl DocumentResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-document results in input order, plus summed statistics.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<DocumentResult>,
    /// Sum over the documents that were cleaned.
    pub totals: CleanStats,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Cleans in-memory texts in parallel. Output order matches input order.
pub fn clean_texts<S: AsRef<str> + Sync>(texts: &[S], cleaner: &Cleaner) -> Vec<CleanOutput> {
    texts
        .par_iter()
        .map(|text| cleaner.clean(text.as_ref()))
        .collect()
}

/// Extracts and cleans files in parallel.
///
/// A failing file is recorded in its result and does not stop the others.
pub fn clean_documents<P: AsRef<Path> + Sync>(paths: &[P], cleaner: &Cleaner) -> BatchReport {
    let results: Vec<DocumentResult> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let outcome = read_document(path).map(|text| cleaner.clean(&text));
            if let Err(e) = &outcome {
                warn!(path = %path.display(), error = %e, "skipping document");
            }
            DocumentResult {
                path: path.to_path_buf(),
                outcome,
            }
        })
        .collect();

    let totals: CleanStats = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .map(|output| output.stats)
        .sum();

    let report = BatchReport { results, totals };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        lines_removed = report.totals.lines_removed,
        "batch finished"
    );
    report
}
