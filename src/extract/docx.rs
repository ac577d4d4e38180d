//! DOCX text extraction.
//!
//! Reads `word/document.xml` from the ZIP container and keeps only run text:
//! `w:t` content, `w:tab` as a tab, `w:br`/`w:cr` as line breaks. Each `w:p`
//! becomes one line.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Main document part inside the container.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a DOCX file.
pub fn extract_docx(path: impl AsRef<Path>) -> Result<String> {
    let data = std::fs::read(path)?;
    extract_docx_bytes(&data)
}

/// Extracts paragraph text from DOCX bytes.
pub fn extract_docx_bytes(data: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| Error::MissingComponent(DOCUMENT_PART.to_string()))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    document_text(&xml)
}

/// Paragraph text of a WordprocessingML body.
pub fn document_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    // Leading and trailing spaces inside w:t are significant.
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"r" => in_run = true,
                b"t" if in_run => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                // Tab stops in w:pPr are also named `tab`; only runs count.
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => in_run = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t>Quarterly</w:t></w:r>
      <w:r><w:t xml:space="preserve"> results &amp; outlook</w:t></w:r>
    </w:p>
    <w:p/>
    <w:p>
      <w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t></w:r>
    </w:p>
    <w:p>
      <w:r><w:t>first</w:t><w:br/><w:t>second</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraph_text() {
        let text = document_text(BODY).unwrap();
        assert_eq!(
            text,
            "Quarterly results & outlook\n\nName\tValue\nfirst\nsecond"
        );
    }

    #[test]
    fn test_extract_from_archive() {
        let data = build_docx(&[
            ("[Content_Types].xml", "<Types/>"),
            (DOCUMENT_PART, BODY),
        ]);
        let text = extract_docx_bytes(&data).unwrap();
        assert!(text.starts_with("Quarterly results & outlook"));
    }

    #[test]
    fn test_missing_document_part() {
        let data = build_docx(&[("word/styles.xml", "<w:styles/>")]);
        assert!(matches!(
            extract_docx_bytes(&data),
            Err(Error::MissingComponent(part)) if part == DOCUMENT_PART
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract_docx_bytes(b"plain text, not a container"),
            Err(Error::ZipArchive(_))
        ));
    }
}
