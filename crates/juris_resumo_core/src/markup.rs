//! crates/juris_resumo_core/src/markup.rs
//!
//! The small subset of markdown the summaries use: one paragraph per line and
//! `**bold**` spans.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Paragraph(Vec<Span>),
}

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"))
}

/// Splits one line into plain and bold spans. Unpaired `**` stays literal.
pub fn parse_line(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for caps in bold_pattern().captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span {
                text: line[cursor..whole.start()].to_string(),
                bold: false,
            });
        }
        spans.push(Span {
            text: inner.as_str().to_string(),
            bold: true,
        });
        cursor = whole.end();
    }
    if cursor < line.len() {
        spans.push(Span {
            text: line[cursor..].to_string(),
            bold: false,
        });
    }
    spans
}

pub fn parse(summary: &str) -> Vec<Line> {
    summary
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                Line::Blank
            } else {
                Line::Paragraph(parse_line(line.trim_end_matches('\r')))
            }
        })
        .collect()
}

/// Plain text with the bold markers removed, as shown in history previews.
pub fn strip_bold_markers(summary: &str) -> String {
    summary.replace("**", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span { text: text.to_string(), bold: false }
    }

    fn bold(text: &str) -> Span {
        Span { text: text.to_string(), bold: true }
    }

    #[test]
    fn splits_bold_and_plain_spans() {
        assert_eq!(
            parse_line("**Partes:** Autor x **Réu**."),
            vec![bold("Partes:"), plain(" Autor x "), bold("Réu"), plain(".")]
        );
    }

    #[test]
    fn unpaired_markers_stay_literal() {
        assert_eq!(parse_line("a ** b"), vec![plain("a ** b")]);
    }

    #[test]
    fn blank_lines_are_kept() {
        let lines = parse("**A**\n\nb");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], Line::Blank);
        assert_eq!(lines[2], Line::Paragraph(vec![plain("b")]));
    }

    #[test]
    fn strips_markers_for_previews() {
        assert_eq!(strip_bold_markers("**Número:** 1"), "Número: 1");
    }
}
