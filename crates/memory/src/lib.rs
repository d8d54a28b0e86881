//! Document memory: PDF bytes → text → chunks → embeddings → vector store.

pub mod chunker;
pub mod embeddings;
pub mod embeddings_fallback;
pub mod embeddings_gemini;
pub mod extract;
pub mod manager;
pub mod schema;
pub mod store;
pub mod store_memory;
pub mod store_pinecone;

pub use {
    chunker::{ChunkOutput, ChunkParams, chunk_text},
    embeddings::EmbeddingProvider,
    embeddings_fallback::{EmbeddingBackend, FallbackEmbedder},
    extract::{PDF_CONTENT_TYPE, PdfExtractor, TextExtractor},
    manager::{Document, IngestReport, Ingestor},
    schema::{Chunk, RecordMetadata, RetrievalMatch, StoredRecord},
    store::VectorStore,
    store_memory::MemoryStore,
    store_pinecone::PineconeStore,
};
