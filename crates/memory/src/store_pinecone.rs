//! Pinecone data-plane adapter (`/vectors/upsert` and `/query`).

use {
    anyhow::{Context, anyhow},
    async_trait::async_trait,
    pdfqa_config::PineconeConfig,
    reqwest::{Client, StatusCode},
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use {
    crate::{
        schema::{RecordMetadata, RetrievalMatch, StoredRecord},
        store::VectorStore,
    },
    pdfqa_common::{Error, Result},
};

const API_VERSION: &str = "2024-07";

pub struct PineconeStore {
    client: Client,
    api_key: Secret<String>,
    index_host: String,
    namespace: Option<String>,
    batch_size: usize,
}

impl std::fmt::Debug for PineconeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeStore")
            .field("api_key", &"[REDACTED]")
            .field("index_host", &self.index_host)
            .field("namespace", &self.namespace)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl PineconeStore {
    /// `index_host` may omit the scheme; `https://` is assumed.
    pub fn new(api_key: Secret<String>, index_host: &str) -> Self {
        let host = index_host.trim().trim_end_matches('/');
        let index_host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Self {
            client: Client::new(),
            api_key,
            index_host,
            namespace: None,
            batch_size: PineconeConfig::default().upsert_batch_size,
        }
    }

    pub fn from_config(config: &PineconeConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("Pinecone API key not configured (PINECONE_API_KEY)"))?;
        let host = config
            .index_host
            .as_deref()
            .ok_or_else(|| anyhow!("Pinecone index host not configured (PINECONE_INDEX_HOST)"))?;
        Ok(Self::new(Secret::new(api_key), host)
            .with_namespace(config.namespace.clone())
            .with_batch_size(config.upsert_batch_size))
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.index_host))
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    async fn upsert_batch(&self, batch: &[StoredRecord]) -> anyhow::Result<()> {
        let body = UpsertRequest {
            vectors: batch
                .iter()
                .map(|r| UpsertVector {
                    id: &r.id,
                    values: &r.vector,
                    metadata: &r.metadata,
                })
                .collect(),
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .post("/vectors/upsert")
            .json(&body)
            .send()
            .await
            .context("failed to send Pinecone upsert request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Pinecone upsert failed: {status} - {body}"));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    fn backend_name(&self) -> &str {
        "pinecone"
    }

    async fn upsert(&self, records: &[StoredRecord]) -> Result<()> {
        let mut written = 0;
        for batch in records.chunks(self.batch_size) {
            self.upsert_batch(batch).await.map_err(|e| {
                Error::store(format!(
                    "{e} ({written} of {} records written before the failure)",
                    records.len()
                ))
            })?;
            written += batch.len();
            debug!(written, total = records.len(), "pinecone upsert batch done");
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .post("/query")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::store(format!("failed to send Pinecone query request: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("pinecone index or namespace not found, treating as empty");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!("Pinecone query failed: {status} - {body}")));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::store(format!("failed to parse Pinecone query response: {e}")))?;

        Ok(parsed.matches.into_iter().map(QueryMatch::into_match).collect())
    }
}

// ── API Types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a RecordMetadata,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

impl QueryMatch {
    /// Pinecone returns every metadata number as a float.
    fn into_match(self) -> RetrievalMatch {
        let meta = self.metadata.as_ref();
        let field = |key: &str| meta.and_then(|m| m.get(key));
        RetrievalMatch {
            score: self.score,
            text: field("text").and_then(|v| v.as_str()).map(str::to_string),
            filename: field("filename").and_then(|v| v.as_str()).map(str::to_string),
            chunk_index: field("chunkIndex")
                .and_then(|v| v.as_f64())
                .map(|n| n as u32),
            id: self.id,
        }
    }
}
