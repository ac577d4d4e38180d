//! Backups and the undo log.
//!
//! Every write keeps the previous file content next to it with a `.bak`
//! suffix, and each run is appended to a JSON log (`.strip-log` by default)
//! so the most recent run can be rolled back.

use crate::cleanup::CleanStats;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default undo log location, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = ".strip-log";

const BACKUP_SUFFIX: &str = ".bak";

/// One file written during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// File that received the cleaned text.
    pub file: PathBuf,
    /// Copy of the previous content; `None` when the file was newly created.
    pub backup: Option<PathBuf>,
    pub timestamp: DateTime<Utc>,
    pub stats: CleanStats,
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_processed: usize,
    #[serde(flatten)]
    pub totals: CleanStats,
}

/// One invocation that wrote files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    pub timestamp: DateTime<Utc>,
    pub operations: Vec<OperationRecord>,
    pub stats: RunStats,
}

/// Outcome of rolling back a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoReport {
    /// When the undone run happened (RFC 3339).
    pub timestamp: String,
    /// Files put back to their previous state.
    pub restored: Vec<PathBuf>,
    /// Files that could not be restored, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Path of the backup kept for `file`: the full file name plus `.bak`.
pub fn backup_path(file: impl AsRef<Path>) -> PathBuf {
    let file = file.as_ref();
    let mut name: OsString = file.file_name().map(OsString::from).unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    file.with_file_name(name)
}

/// Writes `cleaned` to `file`, first copying any existing content to its backup.
pub fn write_with_backup(
    file: impl AsRef<Path>,
    cleaned: &str,
    stats: CleanStats,
) -> Result<OperationRecord> {
    let file = file.as_ref();

    let backup = if file.exists() {
        let backup = backup_path(file);
        fs::copy(file, &backup)?;
        Some(backup)
    } else {
        None
    };

    fs::write(file, cleaned)?;

    Ok(OperationRecord {
        file: file.to_path_buf(),
        backup,
        timestamp: Utc::now(),
        stats,
    })
}

/// Undo log stored as a pretty-printed JSON array of [`RunEntry`].
#[derive(Debug, Clone)]
pub struct History {
    log_path: PathBuf,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl History {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Recorded runs, oldest first. A missing or unreadable log reads as empty.
    pub fn entries(&self) -> Vec<RunEntry> {
        match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(log = %self.log_path.display(), error = %e, "ignoring unreadable undo log");
                Vec::new()
            }
        }
    }

    /// Appends a run to the log. Runs without operations are not recorded.
    pub fn append_run(&self, operations: Vec<OperationRecord>, stats: RunStats) -> Result<()> {
        if operations.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries();
        entries.push(RunEntry {
            timestamp: Utc::now(),
            operations,
            stats,
        });
        self.write_entries(&entries)?;

        info!(log = %self.log_path.display(), runs = entries.len(), "recorded run");
        Ok(())
    }

    /// Restores every file of the most recent run and drops it from the log.
    ///
    /// Files created by the run are removed again. Per-file failures are
    /// collected in the report; the entry is dropped regardless.
    pub fn undo_last(&self) -> Result<UndoReport> {
        if !self.log_path.exists() {
            return Err(Error::NothingToUndo(format!(
                "no log file at {}",
                self.log_path.display()
            )));
        }

        let mut entries = self.read_entries()?;
        let entry = entries
            .pop()
            .ok_or_else(|| Error::NothingToUndo("the log is empty".into()))?;

        let mut report = UndoReport {
            timestamp: entry.timestamp.to_rfc3339(),
            ..Default::default()
        };

        for op in &entry.operations {
            match restore(op) {
                Ok(()) => {
                    info!(file = %op.file.display(), "restored");
                    report.restored.push(op.file.clone());
                }
                Err(reason) => {
                    warn!(file = %op.file.display(), %reason, "restore failed");
                    report.failed.push((op.file.clone(), reason));
                }
            }
        }

        self.write_entries(&entries)?;
        Ok(report)
    }

    fn read_entries(&self) -> Result<Vec<RunEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.log_path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write_entries(&self, entries: &[RunEntry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.log_path, json)?;
        Ok(())
    }
}

fn restore(op: &OperationRecord) -> std::result::Result<(), String> {
    match &op.backup {
        Some(backup) if backup.exists() => fs::copy(backup, &op.file)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Some(backup) => Err(format!("backup not found: {}", backup.display())),
        None => match fs::remove_file(&op.file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        },
    }
}
