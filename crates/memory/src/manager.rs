//! Ingestion pipeline: extract → chunk → embed (one chunk at a time) → upsert.
//!
//! Records are only written after every chunk has been embedded, so a
//! failing embedding call leaves the store untouched for that document.

use std::sync::Arc;

use {
    serde::Serialize,
    tracing::{info, warn},
};

use {
    crate::{
        chunker::{ChunkParams, chunk_text},
        embeddings::EmbeddingProvider,
        extract::TextExtractor,
        schema::{Chunk, StoredRecord},
        store::VectorStore,
    },
    pdfqa_common::{Error, Result},
};

/// Characters of extracted text echoed back in the report.
pub const PREVIEW_CHARS: usize = 500;

/// An uploaded file. Lives only for one ingestion call.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub filename: String,
    /// Length of the extracted text in characters.
    pub text_length: usize,
    pub chunks_stored: usize,
    pub preview: String,
    /// The chunk cap cut the document short.
    pub truncated: bool,
}

pub struct Ingestor {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    params: ChunkParams,
}

impl Ingestor {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            extractor,
            embedder,
            store,
            params: ChunkParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: ChunkParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ChunkParams {
        &self.params
    }

    pub async fn ingest(&self, doc: Document) -> Result<IngestReport> {
        if !self.extractor.supports(&doc.content_type) {
            return Err(Error::invalid_input("Please upload a PDF file"));
        }
        if doc.bytes.is_empty() {
            return Err(Error::invalid_input("Uploaded file is empty"));
        }

        let text = self.extractor.extract(&doc.bytes).await?;
        if text.trim().is_empty() {
            return Err(Error::extraction("No text content found in PDF"));
        }

        let output = chunk_text(&text, &self.params);
        if output.chunks.is_empty() {
            return Err(Error::invalid_input(format!(
                "chunking produced no chunks (chunk_size {}, max_chunks {})",
                self.params.chunk_size, self.params.max_chunks
            )));
        }
        if output.truncated {
            warn!(
                filename = %doc.filename,
                kept = output.chunks.len(),
                "document exceeded the chunk cap, remaining text was not indexed"
            );
        }
        let chunks = Chunk::sequence(&doc.filename, output.chunks);
        let chunk_count = chunks.len();

        let mut records = Vec::with_capacity(chunk_count);
        for chunk in chunks {
            let vector = self.embedder.embed(&chunk.text).await?;
            records.push(StoredRecord::new(uuid::Uuid::new_v4().to_string(), vector, chunk));
        }

        self.store.upsert(&records).await?;

        let report = IngestReport {
            filename: doc.filename,
            text_length: text.chars().count(),
            chunks_stored: chunk_count,
            preview: text.chars().take(PREVIEW_CHARS).collect(),
            truncated: output.truncated,
        };
        info!(
            filename = %report.filename,
            chars = report.text_length,
            chunks = report.chunks_stored,
            embedder = self.embedder.provider_name(),
            store = self.store.backend_name(),
            "document ingested"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{extract::PDF_CONTENT_TYPE, store_memory::MemoryStore},
        async_trait::async_trait,
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    /// Pretends every upload is a PDF containing `text`.
    struct FixedText(String);

    #[async_trait]
    impl TextExtractor for FixedText {
        fn supported_types(&self) -> &[&str] {
            &[PDF_CONTENT_TYPE]
        }

        async fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    /// Embeds text by length; fails from call number `fail_at` on.
    #[derive(Default)]
    struct CountingEmbedder {
        calls: AtomicUsize,
        fail_at: Option<usize>,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at.is_some_and(|f| n >= f) {
                return Err(Error::provider_unavailable(
                    "no embedding model available with quota",
                ));
            }
            Ok(vec![text.len() as f32, 1.0])
        }

        fn provider_name(&self) -> &str {
            "counting"
        }
    }

    fn pdf(name: &str) -> Document {
        Document {
            filename: name.into(),
            content_type: PDF_CONTENT_TYPE.into(),
            bytes: b"%PDF-1.4".to_vec(),
        }
    }

    fn ingestor(
        text: &str,
        embedder: Arc<CountingEmbedder>,
        store: Arc<MemoryStore>,
    ) -> Ingestor {
        Ingestor::new(Arc::new(FixedText(text.into())), embedder, store)
    }

    #[tokio::test]
    async fn test_2500_chars_become_4_sequential_chunks() {
        let text: String = "abcdefghij".repeat(250);
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(MemoryStore::new());

        let report = ingestor(&text, Arc::clone(&embedder), Arc::clone(&store))
            .ingest(pdf("paper.pdf"))
            .await
            .unwrap();

        assert_eq!(report.filename, "paper.pdf");
        assert_eq!(report.text_length, 2500);
        assert_eq!(report.chunks_stored, 4);
        assert_eq!(report.preview.chars().count(), PREVIEW_CHARS);
        assert!(!report.truncated);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 4);

        let mut records = store.records().await;
        records.sort_by_key(|r| r.metadata.chunk_index);
        let indices: Vec<u32> = records.iter().map(|r| r.metadata.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(records.iter().all(|r| r.metadata.filename == "paper.pdf"));
        assert_eq!(records[3].metadata.text.len(), 100);
    }

    #[tokio::test]
    async fn test_rejects_non_pdf() {
        let store = Arc::new(MemoryStore::new());
        let mut doc = pdf("notes.txt");
        doc.content_type = "text/plain".into();

        let err = ingestor("text", Arc::default(), Arc::clone(&store))
            .ingest(doc)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.message(), "Please upload a PDF file");
    }

    #[tokio::test]
    async fn test_rejects_empty_file() {
        let mut doc = pdf("empty.pdf");
        doc.bytes.clear();

        let err = ingestor("text", Arc::default(), Arc::new(MemoryStore::new()))
            .ingest(doc)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_extraction_failure() {
        let err = ingestor(" \n\t ", Arc::default(), Arc::new(MemoryStore::new()))
            .ingest(pdf("scan.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
        assert_eq!(err.message(), "No text content found in PDF");
    }

    #[tokio::test]
    async fn test_embedding_failure_stores_nothing() {
        let text: String = "x".repeat(2500);
        let embedder = Arc::new(CountingEmbedder {
            fail_at: Some(2),
            ..Default::default()
        });
        let store = Arc::new(MemoryStore::new());

        let err = ingestor(&text, embedder, Arc::clone(&store))
            .ingest(pdf("paper.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProviderUnavailable(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_rejected() {
        let embedder = Arc::new(CountingEmbedder::default());
        let store = Arc::new(MemoryStore::new());
        let err = ingestor("real text", Arc::clone(&embedder), Arc::clone(&store))
            .with_params(ChunkParams {
                chunk_size: 0,
                overlap: 0,
                max_chunks: 10,
            })
            .ingest(pdf("paper.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.message().contains("no chunks"));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_truncation_is_reported() {
        let text: String = "y".repeat(100);
        let store = Arc::new(MemoryStore::new());
        let report = ingestor(&text, Arc::default(), Arc::clone(&store))
            .with_params(ChunkParams {
                chunk_size: 10,
                overlap: 0,
                max_chunks: 4,
            })
            .ingest(pdf("long.pdf"))
            .await
            .unwrap();

        assert!(report.truncated);
        assert_eq!(report.chunks_stored, 4);
        assert_eq!(store.len().await, 4);
    }
}
