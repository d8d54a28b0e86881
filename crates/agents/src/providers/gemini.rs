use {
    anyhow::{Result, anyhow},
    async_trait::async_trait,
    pdfqa_config::GeminiConfig,
    pdfqa_providers::{GeminiClient, gemini::GENERATE_CONTENT},
    tokio::sync::OnceCell,
    tracing::{debug, info},
};

use crate::model::LlmProvider;

/// Gemini `generateContent` behind [`LlmProvider`].
///
/// Without an explicit model the catalog is consulted once and the first
/// `gemini` model that supports `generateContent` is used for the rest of
/// the process.
pub struct GeminiGenerator {
    client: GeminiClient,
    model: Option<String>,
    resolved: OnceCell<String>,
}

impl GeminiGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: None,
            resolved: OnceCell::new(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(GeminiClient::from_config(config)).with_model(config.generation_model.clone())
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|m| !m.trim().is_empty());
        self
    }

    async fn model(&self) -> Result<&str> {
        if let Some(ref model) = self.model {
            return Ok(model.as_str());
        }
        let model = self
            .resolved
            .get_or_try_init(|| async {
                let models = self.client.list_models().await?;
                let found = models
                    .into_iter()
                    .find(|m| m.supports(GENERATE_CONTENT) && m.name.contains("gemini"))
                    .map(|m| m.name)
                    .ok_or_else(|| anyhow!("no Gemini generation model available"))?;
                info!(model = %found, "resolved generation model");
                Ok::<_, anyhow::Error>(found)
            })
            .await?;
        Ok(model.as_str())
    }
}

#[async_trait]
impl LlmProvider for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let model = self.model().await?;
        debug!(model, prompt_chars = prompt.chars().count(), "generating answer");
        self.client.generate_content(model, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher, secrecy::Secret};

    const CATALOG: &str = r#"{"models": [
        {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]},
        {"name": "models/chat-bison", "supportedGenerationMethods": ["generateContent"]},
        {"name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"]},
        {"name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent"]}
    ]}"#;

    fn generator(server: &mockito::ServerGuard) -> GeminiGenerator {
        GeminiGenerator::new(
            GeminiClient::new(Some(Secret::new("test-key".into()))).with_base_url(server.url()),
        )
    }

    #[tokio::test]
    async fn test_discovers_model_once() {
        let mut server = mockito::Server::new_async().await;
        let catalog = server
            .mock("GET", "/v1/models")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(CATALOG)
            .expect(1)
            .create_async()
            .await;
        let generate = server
            .mock("POST", "/v1/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Paris"}]}}]}"#)
            .expect(2)
            .create_async()
            .await;

        let llm = generator(&server);
        assert_eq!(llm.generate("first").await.unwrap(), "Paris");
        assert_eq!(llm.generate("second").await.unwrap(), "Paris");
        catalog.assert_async().await;
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn test_configured_model_skips_catalog() {
        let mut server = mockito::Server::new_async().await;
        let catalog = server
            .mock("GET", "/v1/models")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        server
            .mock("POST", "/v1/models/gemini-pinned:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "hello"}]}]
            })))
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "hi"}]}}]}"#)
            .create_async()
            .await;

        let llm = generator(&server).with_model(Some("models/gemini-pinned".into()));
        assert_eq!(llm.generate("hello").await.unwrap(), "hi");
        catalog.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_gemini_model_in_catalog() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/models")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"models": [{"name": "models/chat-bison", "supportedGenerationMethods": ["generateContent"]}]}"#,
            )
            .create_async()
            .await;

        let err = generator(&server).generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("no Gemini generation model"));
    }

    #[tokio::test]
    async fn test_generation_error_message_surfaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/models/gemini-pinned:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": {"message": "Resource has been exhausted"}}"#)
            .create_async()
            .await;

        let err = generator(&server)
            .with_model(Some("models/gemini-pinned".into()))
            .generate("hello")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Resource has been exhausted"));
    }

    #[test]
    fn test_blank_model_override_is_ignored() {
        let llm = GeminiGenerator::new(GeminiClient::new(None)).with_model(Some("  ".into()));
        assert!(llm.model.is_none());
    }
}
