//! Gemini `embedContent` as a backend for [`FallbackEmbedder`].
//!
//! [`FallbackEmbedder`]: crate::embeddings_fallback::FallbackEmbedder

use {
    async_trait::async_trait,
    pdfqa_providers::{GeminiClient, gemini::EMBED_CONTENT},
};

use crate::embeddings_fallback::EmbeddingBackend;

#[async_trait]
impl EmbeddingBackend for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn embed_with_model(&self, model: &str, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_content(model, text).await
    }

    async fn embedding_models(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .list_models()
            .await?
            .into_iter()
            .filter(|m| m.supports(EMBED_CONTENT))
            .map(|m| m.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{embeddings::EmbeddingProvider, embeddings_fallback::FallbackEmbedder},
        mockito::Matcher,
        pdfqa_config::GeminiConfig,
        secrecy::Secret,
        std::sync::Arc,
    };

    #[tokio::test]
    async fn test_falls_back_to_catalog_model() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/models/text-embedding-004:embedContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": {"message": "Quota exceeded"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/v1/text-embedding-004:embedContent")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": {"message": "not found"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/models")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"models": [
                    {"name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent"]},
                    {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]},
                    {"name": "models/gemini-embedding-exp", "supportedGenerationMethods": ["embedContent"]}
                ]}"#,
            )
            .create_async()
            .await;
        let winner = server
            .mock("POST", "/v1/models/gemini-embedding-exp:embedContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"embedding": {"values": [0.5, 0.25]}}"#)
            .create_async()
            .await;
        let skipped = server
            .mock("POST", "/v1/models/embedding-001:embedContent")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client =
            GeminiClient::new(Some(Secret::new("test-key".into()))).with_base_url(server.url());
        let embedder = FallbackEmbedder::from_config(Arc::new(client), &GeminiConfig::default());

        assert_eq!(embedder.embed("hello").await.unwrap(), vec![0.5, 0.25]);
        winner.assert_async().await;
        skipped.assert_async().await;
    }
}
