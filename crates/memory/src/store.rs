//! Storage abstraction for embedded chunks.

use async_trait::async_trait;

use {
    crate::schema::{RetrievalMatch, StoredRecord},
    pdfqa_common::Result,
};

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name for logs and health output.
    fn backend_name(&self) -> &str;

    /// Insert or overwrite records by id. A failure part-way through a
    /// batch is reported as an error; earlier writes may have landed.
    async fn upsert(&self, records: &[StoredRecord]) -> Result<()>;

    /// Nearest neighbours of `vector`, best first, at most `top_k`.
    /// An empty or never-created index yields an empty list.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>>;
}
