//! PDF text extraction through poppler's `pdftotext`.

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

const PDFTOTEXT: &str = "pdftotext";

/// Upper bound for a single extraction.
pub const PDF_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `pdftotext -layout <file> -` and returns its stdout.
pub fn extract_pdf(path: impl AsRef<Path>) -> Result<String> {
    extract_pdf_with_timeout(path.as_ref(), PDF_TIMEOUT)
}

/// Same as [`extract_pdf`] with a custom timeout.
pub fn extract_pdf_with_timeout(path: &Path, timeout: Duration) -> Result<String> {
    let tool_error = |message: String| Error::ExternalTool {
        tool: PDFTOTEXT.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let mut child = Command::new(PDFTOTEXT)
        .arg("-layout")
        .arg(path)
        .arg("-")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ExternalToolMissing {
                tool: PDFTOTEXT.to_string(),
                purpose: "PDF support (poppler-utils)".to_string(),
            },
            _ => Error::Io(e),
        })?;

    // Drain the pipes on their own threads so a large document cannot block the child.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let start = Instant::now();
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if start.elapsed() > timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(tool_error(format!("timed out after {}s", timeout.as_secs())));
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let output = collect(stdout);
    let errors = collect(stderr);

    if !status.success() {
        let detail = String::from_utf8_lossy(&errors).trim().to_string();
        return Err(tool_error(if detail.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {detail}")
        }));
    }

    debug!(path = %path.display(), bytes = output.len(), elapsed = ?start.elapsed(), "pdftotext finished");
    Ok(String::from_utf8_lossy(&output).into_owned())
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut data = Vec::new();
        let _ = pipe.read_to_end(&mut data);
        data
    })
}

fn collect(handle: Option<std::thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_reported() {
        // Either the tool is absent or it fails on the missing input; never Ok.
        let result = extract_pdf("/nonexistent/definitely-missing.pdf");
        assert!(matches!(
            result,
            Err(Error::ExternalToolMissing { .. }) | Err(Error::ExternalTool { .. })
        ));
    }
}
