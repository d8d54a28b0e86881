use std::sync::Arc;

use {
    pdfqa_agents::{LlmProvider, RagRunner, providers::GeminiGenerator},
    pdfqa_config::{PdfqaConfig, StoreBackend},
    pdfqa_memory::{
        EmbeddingProvider, FallbackEmbedder, Ingestor, MemoryStore, PdfExtractor, PineconeStore,
        VectorStore,
    },
    pdfqa_providers::GeminiClient,
    tracing::warn,
};

/// The ingestion and answering pipelines, sharing one embedder and store.
pub struct RagServices {
    pub ingestor: Ingestor,
    pub runner: RagRunner,
    pub store_backend: String,
}

impl RagServices {
    pub fn new(ingestor: Ingestor, runner: RagRunner, store_backend: impl Into<String>) -> Self {
        Self {
            ingestor,
            runner,
            store_backend: store_backend.into(),
        }
    }

    pub fn from_config(config: &PdfqaConfig) -> anyhow::Result<Self> {
        let client = GeminiClient::from_config(&config.gemini);
        if !client.is_configured() {
            warn!("GEMINI_API_KEY is not set, embedding and generation calls will fail");
        }

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FallbackEmbedder::from_config(
            Arc::new(client.clone()),
            &config.gemini,
        ));
        let store: Arc<dyn VectorStore> = match config.store.backend {
            StoreBackend::Pinecone => Arc::new(PineconeStore::from_config(&config.store.pinecone)?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let llm: Arc<dyn LlmProvider> = Arc::new(
            GeminiGenerator::new(client).with_model(config.gemini.generation_model.clone()),
        );

        let ingestor = Ingestor::new(
            Arc::new(PdfExtractor::new()),
            Arc::clone(&embedder),
            Arc::clone(&store),
        )
        .with_params(config.chunking.into());
        let runner = RagRunner::new(embedder, store, llm).with_top_k(config.retrieval.top_k);

        Ok(Self::new(ingestor, runner, config.store.backend.as_str()))
    }
}
