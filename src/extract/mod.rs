//! Raw text extraction from supported input files.
//!
//! Every extractor returns text in the same canonical shape: `\n` line
//! endings, no byte-order mark, NFC-composed characters.

pub mod text;

#[cfg(feature = "docx")]
pub mod docx;

pub mod pdf;

use crate::detect::{detect_format_from_path, FormatType};
use crate::error::Result;
use std::path::Path;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// Extracts text from a file, choosing the extractor by extension.
///
/// # Example
///
/// ```no_run
/// let text = docstrip::extract::read_document("report.txt")?;
/// println!("{} lines", text.lines().count());
/// # Ok::<(), docstrip::Error>(())
/// ```
pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    read_document_as(path, format)
}

/// Extracts text from a file with a known format.
pub fn read_document_as(path: impl AsRef<Path>, format: FormatType) -> Result<String> {
    let path = path.as_ref();

    let raw = match format {
        FormatType::PlainText => text::read_text_file(path)?,
        #[cfg(feature = "docx")]
        FormatType::Docx => docx::extract_docx(path)?,
        #[cfg(not(feature = "docx"))]
        FormatType::Docx => {
            return Err(crate::error::Error::UnsupportedFormat(
                "DOCX support requires 'docx' feature".into(),
            ))
        }
        FormatType::Pdf => pdf::extract_pdf(path)?,
    };

    let text = canonicalize(&raw);
    info!(path = %path.display(), %format, chars = text.len(), "extracted text");
    Ok(text)
}

/// Strips a leading BOM, converts CRLF to LF and composes to NFC.
pub fn canonicalize(raw: &str) -> String {
    let raw = raw.strip_prefix('\u{FEFF}').unwrap_or(raw);
    raw.replace("\r\n", "\n").nfc().collect()
}
