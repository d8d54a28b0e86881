/// Config schema types (provider, vector store, chunking, retrieval, server).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfqaConfig {
    pub gemini: GeminiConfig,
    pub store: StoreConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub server: ServerConfig,
}

/// Hosted embedding/generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (env `GEMINI_API_KEY` takes precedence).
    pub api_key: Option<String>,

    pub base_url: String,

    /// Path segment between the base URL and the model name.
    pub api_version: String,

    /// Embedding models tried first, in order, before consulting the catalog.
    pub preferred_embedding_models: Vec<String>,

    /// Catalog models whose name contains any of these are never tried.
    pub excluded_embedding_models: Vec<String>,

    /// Fixed generation model. When unset the first `gemini` model in the
    /// catalog that supports `generateContent` is used.
    pub generation_model: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_version: "v1".into(),
            preferred_embedding_models: vec![
                "models/text-embedding-004".into(),
                "text-embedding-004".into(),
            ],
            excluded_embedding_models: vec!["embedding-001".into()],
            generation_model: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Pinecone,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pinecone => "pinecone",
            Self::Memory => "memory",
        }
    }
}

/// Vector store selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub pinecone: PineconeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PineconeConfig {
    /// API key (env `PINECONE_API_KEY` takes precedence).
    pub api_key: Option<String>,

    /// Data-plane host of the index, e.g. `https://docs-abc123.svc.pinecone.io`.
    pub index_host: Option<String>,

    pub namespace: Option<String>,

    /// Records sent per upsert request.
    pub upsert_batch_size: usize,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_host: None,
            namespace: None,
            upsert_batch_size: 100,
        }
    }
}

/// Fixed-size character windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    /// Hard cap on chunks emitted for one document.
    pub max_chunks: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            max_chunks: 10_000,
        }
    }
}

impl ChunkingConfig {
    /// Reject windows that could never produce a chunk.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunking.chunk_size must be greater than zero");
        }
        if self.max_chunks == 0 {
            anyhow::bail!("chunking.max_chunks must be greater than zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3000,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}
