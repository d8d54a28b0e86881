//! Provider-agnostic embedding trait for generating vectors from text.

use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text. Ingestion and queries go
    /// through the same call so both live in one embedding space.
    async fn embed(&self, text: &str) -> pdfqa_common::Result<Vec<f32>>;

    /// Short name for logs (e.g. "gemini").
    fn provider_name(&self) -> &str;
}
