//! In-process vector store using brute-force cosine similarity.
//!
//! Nothing survives a restart. Meant for local runs and tests.

use std::collections::HashMap;

use {async_trait::async_trait, tokio::sync::RwLock};

use {
    crate::{
        schema::{RetrievalMatch, StoredRecord},
        store::VectorStore,
    },
    pdfqa_common::{Error, Result},
};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every stored record, ordered by id.
    pub async fn records(&self) -> Vec<StoredRecord> {
        let mut all: Vec<_> = self.records.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for MemoryStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn upsert(&self, records: &[StoredRecord]) -> Result<()> {
        let mut map = self.records.write().await;
        for record in records {
            map.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>> {
        let map = self.records.read().await;

        let mut scored = Vec::with_capacity(map.len());
        for record in map.values() {
            if record.vector.len() != vector.len() {
                return Err(Error::store(format!(
                    "dimension mismatch: query has {}, record {} has {}",
                    vector.len(),
                    record.id,
                    record.vector.len()
                )));
            }
            scored.push((cosine_similarity(vector, &record.vector), record));
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, record)| {
                let meta = include_metadata.then_some(&record.metadata);
                RetrievalMatch {
                    id: record.id.clone(),
                    score,
                    text: meta.map(|m| m.text.clone()),
                    filename: meta.map(|m| m.filename.clone()),
                    chunk_index: meta.map(|m| m.chunk_index),
                }
            })
            .collect())
    }
}
