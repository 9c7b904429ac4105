//! crates/juris_resumo_core/src/intake.rs
//!
//! Size limits for uploads and the character ceiling for case text.

use crate::ports::{DocumentTextExtractor, ExtractionError};

/// Uploads above this many bytes are rejected before extraction.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;
/// Case text is cut to this many characters.
pub const MAX_TEXT_LENGTH: usize = 100_000;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("The file exceeds the {} MB limit.", MAX_FILE_SIZE / (1024 * 1024))]
    FileTooLarge { size: usize },
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// An uploaded document as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeText {
    pub text: String,
    pub truncated: bool,
}

/// Cuts `text` to `MAX_TEXT_LENGTH` characters, reporting whether anything was lost.
pub fn truncate_text(text: &str) -> IntakeText {
    match text.char_indices().nth(MAX_TEXT_LENGTH) {
        Some((byte_index, _)) => IntakeText {
            text: text[..byte_index].to_string(),
            truncated: true,
        },
        None => IntakeText {
            text: text.to_string(),
            truncated: false,
        },
    }
}

/// Size check, extraction, truncation, in that order.
pub fn ingest_upload(
    extractor: &dyn DocumentTextExtractor,
    file: &UploadedFile,
) -> Result<IntakeText, IntakeError> {
    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(IntakeError::FileTooLarge {
            size: file.bytes.len(),
        });
    }
    let text = extractor.extract_text(&file.mime_type, &file.bytes)?;
    Ok(truncate_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingExtractor {
        calls: AtomicUsize,
    }

    impl DocumentTextExtractor for CountingExtractor {
        fn extract_text(&self, mime_type: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if mime_type != PDF_MIME {
                return Err(ExtractionError::UnsupportedType(mime_type.to_string()));
            }
            Ok("x".repeat(bytes.len()))
        }
    }

    fn upload(mime_type: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: "autos.pdf".to_string(),
            mime_type: mime_type.to_string(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn oversized_upload_never_reaches_the_extractor() {
        let extractor = CountingExtractor::default();
        let err = ingest_upload(&extractor, &upload(PDF_MIME, MAX_FILE_SIZE + 1)).unwrap_err();
        assert!(matches!(err, IntakeError::FileTooLarge { .. }));
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn long_text_is_truncated_with_a_flag() {
        let extractor = CountingExtractor::default();
        let result = ingest_upload(&extractor, &upload(PDF_MIME, MAX_TEXT_LENGTH + 10)).unwrap();
        assert!(result.truncated);
        assert_eq!(result.text.chars().count(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn unsupported_type_is_reported() {
        let extractor = CountingExtractor::default();
        let err = ingest_upload(&extractor, &upload("text/plain", 10)).unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Extraction(ExtractionError::UnsupportedType(_))
        ));
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        let text = "ç".repeat(MAX_TEXT_LENGTH + 1);
        let result = truncate_text(&text);
        assert!(result.truncated);
        assert_eq!(result.text.chars().count(), MAX_TEXT_LENGTH);

        let short = truncate_text("ação");
        assert!(!short.truncated);
        assert_eq!(short.text, "ação");
    }
}
