//! Plain text decoding.

use crate::error::Result;
use encoding_rs::WINDOWS_1252;
use std::path::Path;
use tracing::warn;

/// Reads a text file as UTF-8, falling back to Latin-1.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let (text, fallback) = decode_text(&bytes);
    if fallback {
        warn!(path = %path.display(), "invalid UTF-8, decoded as Latin-1");
    }
    Ok(text)
}

/// Decodes bytes as UTF-8, or as Latin-1 when they are not valid UTF-8.
///
/// Latin-1 uses the WHATWG mapping (`windows-1252`), which never fails.
/// Returns the text and whether the fallback was used.
pub fn decode_text(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), false),
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text.into_owned(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let (text, fallback) = decode_text("naïve café".as_bytes());
        assert_eq!(text, "naïve café");
        assert!(!fallback);
    }

    #[test]
    fn test_latin1_fallback() {
        // "café" encoded as Latin-1
        let (text, fallback) = decode_text(&[0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(text, "café");
        assert!(fallback);
    }

    #[test]
    fn test_read_text_file_with_latin1_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        std::fs::write(&path, b"Gr\xFC\xDFe\n").unwrap();
        assert_eq!(read_text_file(&path).unwrap(), "Grüße\n");
    }
}
