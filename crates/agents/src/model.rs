use async_trait::async_trait;

/// Text generation provider (Gemini, or a stub in tests).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One single-turn generation call. The returned text is passed through
    /// to the caller verbatim.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
