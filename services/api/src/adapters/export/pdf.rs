//! Text-based PDF rendering of a summary on A4 pages with the standard
//! Helvetica fonts.

use super::{title, ExportError};
use juris_resumo_core::markup::{self, Line};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const FONT_SIZE: f32 = 11.0;
const TITLE_SIZE: f32 = 16.0;
const LEADING: f32 = 15.0;
/// Average Helvetica glyph width in em, used to estimate line capacity.
const AVG_GLYPH_EM: f32 = 0.52;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// A word and whether whitespace preceded it in the source line.
#[derive(Debug, Clone, PartialEq)]
struct Word {
    text: String,
    bold: bool,
    space_before: bool,
}

/// One laid-out line: its words, font size and the vertical space it consumes.
struct TextLine {
    words: Vec<Word>,
    size: f32,
    advance: f32,
}

/// Splits spans into words. A word changing weight mid-way becomes two words
/// with no space between them.
fn words_of(spans: &[markup::Span]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut pending_space = false;
    let mut open = false;
    for span in spans {
        for c in span.text.chars() {
            if c.is_whitespace() {
                pending_space = true;
                open = false;
                continue;
            }
            match words.last_mut() {
                Some(last) if open && last.bold == span.bold => last.text.push(c),
                _ => {
                    let space_before = pending_space && !words.is_empty();
                    words.push(Word {
                        text: c.to_string(),
                        bold: span.bold,
                        space_before,
                    });
                    pending_space = false;
                    open = true;
                }
            }
        }
    }
    words
}

fn capacity(size: f32) -> usize {
    ((PAGE_WIDTH - 2.0 * MARGIN) / (size * AVG_GLYPH_EM)) as usize
}

/// Greedy word wrap. A word longer than a whole line is placed on its own line.
fn wrap(words: Vec<Word>, size: f32) -> Vec<Vec<Word>> {
    let max = capacity(size);
    let mut lines = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut width = 0;
    for mut word in words {
        let len = word.text.chars().count() + usize::from(word.space_before);
        if !line.is_empty() && width + len > max && word.space_before {
            lines.push(std::mem::take(&mut line));
            width = 0;
        }
        if line.is_empty() {
            word.space_before = false;
        }
        width += word.text.chars().count() + usize::from(word.space_before);
        line.push(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn layout(process_number: &str, summary: &str) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let heading = words_of(&[markup::Span {
        text: title(process_number),
        bold: true,
    }]);
    for words in wrap(heading, TITLE_SIZE) {
        lines.push(TextLine {
            words,
            size: TITLE_SIZE,
            advance: TITLE_SIZE * 1.4,
        });
    }
    lines.push(TextLine {
        words: Vec::new(),
        size: FONT_SIZE,
        advance: LEADING,
    });

    for line in markup::parse(summary) {
        match line {
            Line::Blank => lines.push(TextLine {
                words: Vec::new(),
                size: FONT_SIZE,
                advance: LEADING,
            }),
            Line::Paragraph(spans) => {
                for words in wrap(words_of(&spans), FONT_SIZE) {
                    lines.push(TextLine {
                        words,
                        size: FONT_SIZE,
                        advance: LEADING,
                    });
                }
            }
        }
    }
    lines
}

/// Maps text onto WinAnsiEncoding; characters it cannot represent become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

fn line_operations(line: &TextLine, y: f32) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Td", vec![MARGIN.into(), y.into()]),
    ];
    let mut font: Option<bool> = None;
    for word in &line.words {
        if font != Some(word.bold) {
            let name = if word.bold { BOLD } else { REGULAR };
            ops.push(Operation::new("Tf", vec![name.into(), line.size.into()]));
            font = Some(word.bold);
        }
        let text = if word.space_before {
            format!(" {}", word.text)
        } else {
            word.text.clone()
        };
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(&text))],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// Splits the laid-out lines into pages of content operations.
fn paginate(lines: &[TextLine]) -> Vec<Vec<Operation>> {
    let mut pages = Vec::new();
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in lines {
        if y - line.advance < MARGIN {
            pages.push(std::mem::take(&mut ops));
            y = PAGE_HEIGHT - MARGIN;
        }
        y -= line.advance;
        if !line.words.is_empty() {
            ops.extend(line_operations(line, y));
        }
    }
    pages.push(ops);
    pages
}

fn font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

pub(super) fn render(process_number: &str, summary: &str) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = font(&mut doc, "Helvetica");
    let bold_id = font(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in paginate(&layout(process_number, summary)) {
        let content = Content { operations }
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}
