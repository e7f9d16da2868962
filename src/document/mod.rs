//! src/document/mod.rs
//!
//! Turns an uploaded file into plain text. PDFs go through `pdf-extract`;
//! plain-text uploads are accepted when the client labels them as text.

use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF-";
const TEXT_EXTENSIONS: [&str; 2] = [".txt", ".md"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("uploaded document is empty")]
    Empty,

    #[error("unsupported or malformed document: {0}")]
    Format(String),
}

/// The kinds of upload the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// PDF is recognised by its magic bytes regardless of what the client claims.
    pub fn kind(&self) -> Option<DocumentKind> {
        if self.bytes.starts_with(PDF_MAGIC) {
            return Some(DocumentKind::Pdf);
        }

        let text_type = self
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("text/"));
        let text_name = self.file_name.as_deref().is_some_and(|name| {
            let name = name.to_ascii_lowercase();
            TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        });

        if text_type || text_name {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }
}

/// Extracts trimmed plain text from an upload. Nothing partial is ever returned.
pub fn extract_text(upload: &Upload) -> Result<String, DocumentError> {
    if upload.bytes.is_empty() {
        return Err(DocumentError::Empty);
    }

    let text = match upload.kind() {
        Some(DocumentKind::Pdf) => extract_pdf_text(&upload.bytes)?,
        Some(DocumentKind::PlainText) => String::from_utf8(upload.bytes.clone())
            .map_err(|e| DocumentError::Format(format!("text upload is not valid UTF-8: {}", e)))?,
        None => {
            return Err(DocumentError::Format(format!(
                "expected a PDF document, got {}",
                upload
                    .content_type
                    .as_deref()
                    .unwrap_or("an unrecognised file")
            )));
        }
    };

    Ok(text.trim().to_string())
}

/// Runs [`extract_text`] on the blocking pool. A panic inside the PDF parser
/// is reported as a format error.
pub async fn extract_text_blocking(upload: Upload) -> Result<String, DocumentError> {
    match tokio::task::spawn_blocking(move || extract_text(&upload)).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(DocumentError::Format(
            "PDF parser failed on this document".to_string(),
        )),
        Err(e) => Err(DocumentError::Format(format!("extraction aborted: {}", e))),
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DocumentError::Format(format!("failed to read PDF: {}", e)))?;
    log::debug!("Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pdf_by_magic_bytes() {
        let upload = Upload::new(b"%PDF-1.7\n...".to_vec()).with_content_type("text/plain");
        assert_eq!(upload.kind(), Some(DocumentKind::Pdf));
    }

    #[test]
    fn detects_text_by_content_type_or_extension() {
        let by_type = Upload::new(b"Q: a\nA: b".to_vec()).with_content_type("text/plain; charset=utf-8");
        let by_name = Upload::new(b"Q: a\nA: b".to_vec()).with_file_name("FAQ.TXT");
        let unknown = Upload::new(b"Q: a\nA: b".to_vec()).with_file_name("faq.docx");

        assert_eq!(by_type.kind(), Some(DocumentKind::PlainText));
        assert_eq!(by_name.kind(), Some(DocumentKind::PlainText));
        assert_eq!(unknown.kind(), None);
    }

    #[test]
    fn text_upload_is_trimmed() {
        let upload = Upload::new(b"\n\n  Q: What is X?\nA: X is Y.\n  ".to_vec()).with_file_name("qa.txt");
        assert_eq!(extract_text(&upload).unwrap(), "Q: What is X?\nA: X is Y.");
    }

    #[test]
    fn empty_and_unknown_uploads_are_rejected() {
        assert!(matches!(
            extract_text(&Upload::new(Vec::<u8>::new())),
            Err(DocumentError::Empty)
        ));
        assert!(matches!(
            extract_text(&Upload::new(vec![0u8, 159, 146, 150]).with_file_name("blob.bin")),
            Err(DocumentError::Format(_))
        ));
    }

    #[test]
    fn invalid_utf8_text_is_a_format_error() {
        let upload = Upload::new(vec![0xffu8, 0xfe, 0x00]).with_content_type("text/plain");
        assert!(matches!(extract_text(&upload), Err(DocumentError::Format(_))));
    }

    #[tokio::test]
    async fn pdf_text_is_extracted_line_by_line() {
        let upload = Upload::new(include_bytes!("../../tests/fixtures/what_is_x.pdf").to_vec())
            .with_file_name("faq.pdf")
            .with_content_type("application/pdf");
        assert_eq!(upload.kind(), Some(DocumentKind::Pdf));

        let text = extract_text_blocking(upload).await.unwrap();
        assert!(text.starts_with("Q: What is X?"), "unexpected text: {text:?}");
        assert!(text.ends_with("A: X is Y."), "unexpected text: {text:?}");

        let store = crate::qa::extract_qa(&text);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("What is X?"), Some("X is Y."));
    }

    #[tokio::test]
    async fn truncated_pdf_is_a_format_error() {
        let upload = Upload::new(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog".to_vec());
        assert!(matches!(
            extract_text_blocking(upload).await,
            Err(DocumentError::Format(_))
        ));
    }
}
