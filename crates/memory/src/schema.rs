//! Records flowing from the chunker through the embedder into a vector store.

use serde::{Deserialize, Serialize};

/// A 0-indexed piece of one document's extracted text. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub index: u32,
    pub source_filename: String,
}

impl Chunk {
    /// Number the chunker's windows in order for `filename`.
    pub fn sequence(filename: &str, texts: Vec<String>) -> Vec<Self> {
        texts
            .into_iter()
            .zip(0u32..)
            .map(|(text, index)| Self {
                text,
                index,
                source_filename: filename.to_string(),
            })
            .collect()
    }
}

/// Metadata stored next to each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub text: String,
    pub filename: String,
    pub chunk_index: u32,
}

/// The unit persisted by a vector store. Upserts with the same `id` overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl StoredRecord {
    pub fn new(id: String, vector: Vec<f32>, chunk: Chunk) -> Self {
        Self {
            id,
            vector,
            metadata: RecordMetadata {
                text: chunk.text,
                filename: chunk.source_filename,
                chunk_index: chunk.index,
            },
        }
    }
}

/// One nearest-neighbour hit. Metadata fields are `None` when the query did
/// not ask for metadata or the store had none for the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalMatch {
    #[serde(skip)]
    pub id: String,
    pub score: f32,
    pub text: Option<String>,
    pub filename: Option<String>,
    pub chunk_index: Option<u32>,
}
