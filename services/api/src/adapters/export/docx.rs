//! Minimal WordprocessingML package: a bold title followed by one paragraph
//! per summary line.

use super::{title, ExportError};
use juris_resumo_core::markup::{self, Line, Span};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const FONT: &str = r#"<w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/>"#;

fn run(span: &Span, half_points: u32) -> String {
    let bold = if span.bold { "<w:b/>" } else { "" };
    format!(
        r#"<w:r><w:rPr>{FONT}{bold}<w:sz w:val="{half_points}"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape(span.text.as_str())
    )
}

fn document_xml(process_number: &str, summary: &str) -> String {
    let mut body = String::new();
    let heading = Span {
        text: title(process_number),
        bold: true,
    };
    body.push_str(&format!("<w:p>{}</w:p>", run(&heading, 32)));

    for line in markup::parse(summary) {
        match line {
            Line::Blank => body.push_str("<w:p/>"),
            Line::Paragraph(spans) => {
                body.push_str("<w:p>");
                for span in &spans {
                    body.push_str(&run(span, 22));
                }
                body.push_str("</w:p>");
            }
        }
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

pub(super) fn render(process_number: &str, summary: &str) -> Result<Vec<u8>, ExportError> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("word/document.xml", document_xml(process_number, summary)),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name, SimpleFileOptions::default())
            .map_err(|e| ExportError::Docx(e.to_string()))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| ExportError::Docx(e.to_string()))?;
    }
    let cursor = zip.finish().map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::extractor::FileParser;
    use juris_resumo_core::intake::DOCX_MIME;
    use juris_resumo_core::ports::DocumentTextExtractor;

    #[test]
    fn bold_spans_become_bold_runs() {
        let xml = document_xml("1", "**Partes:** A & B");
        assert!(xml.contains(r#"<w:b/><w:sz w:val="22"/></w:rPr><w:t xml:space="preserve">Partes:</w:t>"#));
        assert!(xml.contains("> A &amp; B</w:t>"));
    }

    #[test]
    fn package_reads_back_through_the_extractor() {
        let bytes = render("0001234-56", "**Partes:** Autor x Réu\n\nFim").unwrap();
        let text = FileParser::new().extract_text(DOCX_MIME, &bytes).unwrap();
        assert_eq!(
            text,
            "Resumo do Processo: 0001234-56\n\nPartes: Autor x Réu\n\n\n\nFim"
        );
    }
}
