//! services/api/src/adapters/extractor.rs
//!
//! Text extraction for uploaded case files. Implements the
//! `DocumentTextExtractor` port for PDF (`pdf-extract`) and DOCX (`zip` plus
//! `quick-xml` over `word/document.xml`).

use juris_resumo_core::intake::{DOCX_MIME, PDF_MIME};
use juris_resumo_core::ports::{DocumentTextExtractor, ExtractionError};
use quick_xml::{events::Event, Reader as XmlReader};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Dispatches on the declared MIME type only.
#[derive(Clone, Copy, Default)]
pub struct FileParser;

impl FileParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentTextExtractor for FileParser {
    fn extract_text(&self, mime_type: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        match mime_type {
            PDF_MIME => extract_pdf_text(bytes),
            DOCX_MIME => extract_docx_text(bytes),
            other => Err(ExtractionError::UnsupportedType(other.to_string())),
        }
    }
}

/// Each page's text followed by a newline. `pdf-extract` separates pages with
/// form feeds.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Extraction(format!("PDF: {}", e)))?;

    let mut output = String::with_capacity(text.len());
    let mut pages = 0;
    for page in text.split('\x0C') {
        if page.trim().is_empty() {
            continue;
        }
        output.push_str(page.trim());
        output.push('\n');
        pages += 1;
    }
    debug!("Extracted {} PDF pages ({} chars)", pages, output.len());
    Ok(output)
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Extraction(format!("DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Extraction(format!("DOCX is missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Extraction(format!("DOCX XML: {}", e)))?;

    document_xml_text(&xml)
}

/// Text runs of a WordprocessingML body. Paragraphs are separated by a blank
/// line; tabs and breaks are kept.
fn document_xml_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" if !output.is_empty() => output.push_str("\n\n"),
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                b"w:t" => in_text_node = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:p" if !output.is_empty() => output.push_str("\n\n"),
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_node => {
                let value = e
                    .unescape()
                    .map_err(|err| ExtractionError::Extraction(err.to_string()))?;
                output.push_str(&value);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => in_text_node = false,
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractionError::Extraction(format!(
                    "failed to parse DOCX XML: {}",
                    err
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(output.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with(document_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Autos nº 123</w:t></w:r></w:p>
    <w:p><w:r><w:t>Autor</w:t><w:tab/><w:t>Réu &amp; outros</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Fim</w:t><w:br/><w:t>linha</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn docx_paragraphs_tabs_and_breaks_survive() {
        let text = FileParser::new()
            .extract_text(DOCX_MIME, &docx_with(BODY))
            .unwrap();
        assert_eq!(text, "Autos nº 123\n\nAutor\tRéu & outros\n\n\n\nFim\nlinha");
    }

    #[test]
    fn docx_without_document_part_is_an_extraction_error() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert!(matches!(
            FileParser::new().extract_text(DOCX_MIME, &bytes),
            Err(ExtractionError::Extraction(_))
        ));
    }

    #[test]
    fn corrupt_docx_is_an_extraction_error() {
        assert!(matches!(
            FileParser::new().extract_text(DOCX_MIME, b"not a zip"),
            Err(ExtractionError::Extraction(_))
        ));
    }

    #[test]
    fn other_mime_types_are_unsupported() {
        assert!(matches!(
            FileParser::new().extract_text("text/plain", b"texto"),
            Err(ExtractionError::UnsupportedType(t)) if t == "text/plain"
        ));
    }
}
