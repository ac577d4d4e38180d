//! Input format detection for extracted-text sources.

use crate::error::{Error, Result};
use std::path::Path;

/// Magic bytes for PDF documents.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Magic bytes for ZIP archive (DOCX)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Supported input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// UTF-8 (or Latin-1) plain text
    PlainText,
    /// Office Open XML word processing document (ZIP container)
    Docx,
    /// PDF, extracted through `pdftotext`
    Pdf,
}

impl FormatType {
    /// Canonical lowercase extension.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::PlainText => "txt",
            FormatType::Docx => "docx",
            FormatType::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::PlainText => write!(f, "plain text"),
            FormatType::Docx => write!(f, "DOCX"),
            FormatType::Pdf => write!(f, "PDF"),
        }
    }
}

/// Detect input format from a file extension (case-insensitive).
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok(FormatType::PlainText),
        "docx" => Ok(FormatType::Docx),
        "pdf" => Ok(FormatType::Pdf),
        "" => Err(Error::UnsupportedFormat(format!(
            "{} has no file extension",
            path.display()
        ))),
        other => Err(Error::UnsupportedFormat(format!(".{other}"))),
    }
}

/// Detect input format from content.
///
/// Anything that is neither a PDF nor a ZIP container is treated as text.
pub fn detect_format_from_bytes(data: &[u8]) -> FormatType {
    if data.starts_with(PDF_MAGIC) {
        return FormatType::Pdf;
    }

    if data.starts_with(&ZIP_MAGIC) {
        return FormatType::Docx;
    }

    FormatType::PlainText
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            detect_format_from_path("notes.txt").unwrap(),
            FormatType::PlainText
        );
        assert_eq!(
            detect_format_from_path("Report.DOCX").unwrap(),
            FormatType::Docx
        );
        assert_eq!(
            detect_format_from_path("dir/scan.Pdf").unwrap(),
            FormatType::Pdf
        );
    }

    #[test]
    fn test_detect_unsupported_extension() {
        assert!(matches!(
            detect_format_from_path("letter.rtf"),
            Err(Error::UnsupportedFormat(ext)) if ext == ".rtf"
        ));
        assert!(matches!(
            detect_format_from_path("README"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_pdf_magic() {
        assert_eq!(detect_format_from_bytes(b"%PDF-1.7\n%..."), FormatType::Pdf);
    }

    #[test]
    fn test_detect_zip_magic() {
        let data = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00];
        assert_eq!(detect_format_from_bytes(&data), FormatType::Docx);
    }

    #[test]
    fn test_short_or_unknown_data_is_text() {
        assert_eq!(detect_format_from_bytes(b""), FormatType::PlainText);
        assert_eq!(detect_format_from_bytes(b"PK"), FormatType::PlainText);
        assert_eq!(
            detect_format_from_bytes("Hello, world".as_bytes()),
            FormatType::PlainText
        );
    }
}
