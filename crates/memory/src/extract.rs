//! Raw document bytes to plain text.

use {async_trait::async_trait, tracing::debug};

use pdfqa_common::{Error, Result};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Content types this extractor accepts.
    fn supported_types(&self) -> &[&str];

    async fn extract(&self, bytes: &[u8]) -> Result<String>;

    fn supports(&self, content_type: &str) -> bool {
        // Ignore parameters such as `; charset=binary`.
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        self.supported_types()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(essence))
    }
}

/// PDF text extraction via `pdf-extract`.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn supported_types(&self) -> &[&str] {
        &[PDF_CONTENT_TYPE]
    }

    async fn extract(&self, bytes: &[u8]) -> Result<String> {
        debug!(bytes = bytes.len(), "extracting PDF text");
        let owned = bytes.to_vec();
        let text = run_parser(move || pdf_extract::extract_text_from_mem(&owned)).await?;
        debug!(chars = text.chars().count(), "extracted PDF text");
        Ok(text)
    }
}

/// Run a CPU-bound parser on the blocking pool. A panic inside `parse`
/// becomes an extraction error, which needs `panic = "unwind"` in every
/// profile.
async fn run_parser<F, E>(parse: F) -> Result<String>
where
    F: FnOnce() -> std::result::Result<String, E> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| Error::extraction(format!("PDF parser crashed: {e}")))?
        .map_err(|e| Error::extraction(format!("failed to parse PDF: {e}")))
}
