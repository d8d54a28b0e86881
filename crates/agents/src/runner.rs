use std::sync::Arc;

use {
    pdfqa_common::{Error, Result},
    pdfqa_memory::{EmbeddingProvider, RetrievalMatch, VectorStore},
    serde::Serialize,
    tracing::{debug, info, warn},
};

use crate::{
    model::LlmProvider,
    prompt::{NO_CONTEXT_ANSWER, build_context, build_grounded_prompt},
};

/// Matches retrieved per question unless overridden.
pub const DEFAULT_TOP_K: usize = 5;

/// Result of one question-answer cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    /// Matches that contributed text to the prompt. Zero means the fallback
    /// answer was returned and no generation call was made.
    #[serde(skip)]
    pub context_chunks: usize,
}

impl Answer {
    pub fn is_grounded(&self) -> bool {
        self.context_chunks > 0
    }
}

/// Embed → retrieve → assemble context → generate.
pub struct RagRunner {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl RagRunner {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Nearest chunks for `query`, best first, with metadata.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievalMatch>> {
        let vector = self.embedder.embed(query).await?;
        let matches = self.store.query(&vector, top_k, true).await?;
        debug!(
            top_k,
            matches = matches.len(),
            store = self.store.backend_name(),
            "retrieved matches"
        );
        Ok(matches)
    }

    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_input("Question is required"));
        }

        let matches = self.retrieve(question, self.top_k).await?;
        let context = build_context(&matches);
        if context.is_empty() {
            info!(matches = matches.len(), "no context retrieved, returning fallback answer");
            return Ok(Answer {
                answer: NO_CONTEXT_ANSWER.to_string(),
                context_chunks: 0,
            });
        }

        let context_chunks = matches
            .iter()
            .filter(|m| m.text.as_deref().is_some_and(|t| !t.trim().is_empty()))
            .count();
        let prompt = build_grounded_prompt(&context, question);
        let answer = self.llm.generate(&prompt).await.map_err(|e| {
            warn!(provider = self.llm.name(), error = %e, "generation failed");
            Error::provider_unavailable(format!("generation failed: {e}"))
        })?;

        info!(
            context_chunks,
            answer_chars = answer.chars().count(),
            provider = self.llm.name(),
            "answered question"
        );
        Ok(Answer {
            answer,
            context_chunks,
        })
    }
}
