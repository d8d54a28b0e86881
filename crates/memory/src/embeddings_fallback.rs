//! Ordered fallback across embedding models.
//!
//! Preferred models are tried first, then every embedding-capable model from
//! the provider's catalog that is not excluded. Each candidate gets exactly
//! one request; the first non-empty vector wins.

use std::sync::Arc;

use {
    async_trait::async_trait,
    pdfqa_common::{Error, Result},
    pdfqa_config::GeminiConfig,
    tracing::{debug, warn},
};

use crate::embeddings::EmbeddingProvider;

/// The single-request operations the fallback chain is built from.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    fn name(&self) -> &str;

    /// One embedding request against one model.
    async fn embed_with_model(&self, model: &str, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Names of embedding-capable models, in catalog order.
    async fn embedding_models(&self) -> anyhow::Result<Vec<String>>;
}

pub struct FallbackEmbedder {
    backend: Arc<dyn EmbeddingBackend>,
    preferred: Vec<String>,
    excluded: Vec<String>,
}

impl FallbackEmbedder {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, preferred: Vec<String>) -> Self {
        Self {
            backend,
            preferred,
            excluded: Vec::new(),
        }
    }

    pub fn from_config(backend: Arc<dyn EmbeddingBackend>, config: &GeminiConfig) -> Self {
        Self::new(backend, config.preferred_embedding_models.clone())
            .with_excluded(config.excluded_embedding_models.clone())
    }

    /// Catalog models whose name contains any of `patterns` are skipped.
    #[must_use]
    pub fn with_excluded(mut self, patterns: Vec<String>) -> Self {
        self.excluded = patterns;
        self
    }

    fn is_excluded(&self, model: &str) -> bool {
        self.excluded.iter().any(|p| model.contains(p.as_str()))
    }

    /// Returns the vector when `model` produced a usable one. Failures are
    /// logged and swallowed.
    async fn attempt(&self, model: &str, text: &str) -> Option<Vec<f32>> {
        debug!(model, "requesting embedding");
        match self.backend.embed_with_model(model, text).await {
            Ok(values) if !values.is_empty() => {
                debug!(model, dims = values.len(), "embedding succeeded");
                Some(values)
            },
            Ok(_) => {
                warn!(model, "embedding response had no values, trying next model");
                None
            },
            Err(e) => {
                warn!(model, error = %e, "embedding failed, trying next model");
                None
            },
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FallbackEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        for model in &self.preferred {
            if let Some(values) = self.attempt(model, text).await {
                return Ok(values);
            }
        }

        let catalog = self.backend.embedding_models().await.map_err(|e| {
            warn!(error = %e, "failed to list embedding models");
            Error::provider_unavailable(format!("no embedding model available: {e}"))
        })?;

        let candidates = catalog
            .iter()
            .filter(|m| !self.is_excluded(m) && !self.preferred.contains(*m));
        for model in candidates {
            if let Some(values) = self.attempt(model, text).await {
                return Ok(values);
            }
        }

        Err(Error::provider_unavailable(
            "no embedding model available with quota",
        ))
    }

    fn provider_name(&self) -> &str {
        self.backend.name()
    }
}
