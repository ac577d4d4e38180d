//! Error types for docstrip library.
//!
//! The cleaning core never fails on `&str` input; every variant here comes
//! from the extraction, catalog or history layers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docstrip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for docstrip library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file type is not supported (e.g., `.rtf`).
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive parsing error (DOCX container).
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// XML parsing error in a DOCX part.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Required archive member is missing.
    #[error("Missing required component: {0}")]
    MissingComponent(String),

    /// External extraction tool is not installed.
    #[error("External tool not found: {tool} (install it for {purpose})")]
    ExternalToolMissing { tool: String, purpose: String },

    /// External extraction tool failed or timed out.
    #[error("{tool} failed on {}: {message}", path.display())]
    ExternalTool {
        tool: String,
        path: PathBuf,
        message: String,
    },

    /// A header/footer catalog pattern does not compile.
    #[error("Invalid header/footer pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// JSON (de)serialization error for catalogs and the undo log.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The undo log has no recorded run.
    #[error("Nothing to undo: {0}")]
    NothingToUndo(String),
}

#[cfg(feature = "docx")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

#[cfg(feature = "docx")]
impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
