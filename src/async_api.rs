//! Async API for non-blocking document cleaning.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! docstrip = { version = "0.1", features = ["async"] }
//! ```

use crate::cleanup::{CleanOutput, Cleaner};
use crate::clean_options::CleanOptions;
use crate::error::{Error, Result};
use crate::FormatType;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(e.to_string()))
}

/// Asynchronously extracts a document's text.
///
/// Extraction may shell out to `pdftotext`, so it runs on the blocking pool.
pub async fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let path: PathBuf = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || crate::extract::read_document(&path))
        .await
        .map_err(join_error)?
}

/// Asynchronously extracts and cleans a file.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> docstrip::Result<()> {
/// use docstrip::CleanOptions;
///
/// let output = docstrip::async_api::clean_file("notes.txt", &CleanOptions::default()).await?;
/// println!("{}", output.text);
/// # Ok(())
/// # }
/// ```
pub async fn clean_file(path: impl AsRef<Path>, options: &CleanOptions) -> Result<CleanOutput> {
    let text = read_document(path).await?;
    clean_text(text, Cleaner::new(options.clone())).await
}

/// Asynchronously cleans text read from an async reader (UTF-8 with Latin-1 fallback).
pub async fn clean_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    cleaner: Cleaner,
) -> Result<CleanOutput> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    let (text, _) = crate::extract::text::decode_text(&data);
    clean_text(crate::extract::canonicalize(&text), cleaner).await
}

/// Cleans text on the blocking pool.
pub async fn clean_text(text: String, cleaner: Cleaner) -> Result<CleanOutput> {
    tokio::task::spawn_blocking(move || cleaner.clean(&text))
        .await
        .map_err(join_error)
}

/// Asynchronously detects the format of a file from its content.
pub async fn detect_format(path: impl AsRef<Path>) -> Result<FormatType> {
    let data = fs::read(path).await?;
    Ok(crate::detect_format_from_bytes(&data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_reader() {
        let input: &[u8] = b"Intro.\r\n\r\n42\r\nIntro.";
        let output = clean_reader(input, Cleaner::new(CleanOptions::minimal()))
            .await
            .unwrap();
        assert_eq!(output.text, "Intro.");
        assert_eq!(output.stats.header_footer_removed, 1);
        assert_eq!(output.stats.duplicates_collapsed, 1);
    }

    #[tokio::test]
    async fn test_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Hello world\nthis is fine.").await.unwrap();

        let output = clean_file(&path, &CleanOptions::default()).await.unwrap();
        assert_eq!(output.text, "Hello world this is fine.");
    }

    #[tokio::test]
    async fn test_detect_format_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renamed.bin");
        fs::write(&path, b"%PDF-1.4\n").await.unwrap();
        assert_eq!(detect_format(&path).await.unwrap(), FormatType::Pdf);
    }
}
