//! Gemini REST client: model catalog, `embedContent` and `generateContent`.
//!
//! Every call is a single request. Retrying across models is the caller's
//! business (see the fallback embedder in `pdfqa-memory`).

use {
    anyhow::{Context, Result, anyhow},
    pdfqa_config::GeminiConfig,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::debug,
};

/// Catalog method name for embedding models.
pub const EMBED_CONTENT: &str = "embedContent";
/// Catalog method name for text generation models.
pub const GENERATE_CONTENT: &str = "generateContent";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<Secret<String>>,
    base_url: String,
    api_version: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: Option<Secret<String>>) -> Self {
        let defaults = GeminiConfig::default();
        Self {
            client: Client::new(),
            api_key,
            base_url: defaults.base_url,
            api_version: defaults.api_version,
        }
    }

    #[must_use]
    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(config.api_key.clone().map(Secret::new))
            .with_base_url(config.base_url.clone())
            .with_api_version(config.api_version.clone())
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, version: String) -> Self {
        self.api_version = version;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&Secret<String>> {
        self.api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Gemini API key not configured"))
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/{}/{model}:{method}", self.base_url, self.api_version)
    }

    /// List every model visible to the API key, in catalog order.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let api_key = self.api_key()?;
        let url = format!("{}/{}/models", self.base_url, self.api_version);

        let response = self
            .client
            .get(&url)
            .query(&[("key", api_key.expose_secret())])
            .send()
            .await
            .context("failed to send Gemini list models request")?;

        let list: ModelList = parse_response(response, "list models").await?;
        debug!(count = list.models.len(), "listed Gemini models");
        Ok(list.models)
    }

    /// Embed `text` with one specific model.
    pub async fn embed_content(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let api_key = self.api_key()?;
        let body = EmbedContentRequest {
            content: Content::from_text(text),
        };

        let response = self
            .client
            .post(self.model_url(model, EMBED_CONTENT))
            .query(&[("key", api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .context("failed to send Gemini embedContent request")?;

        let parsed: EmbedContentResponse = parse_response(response, EMBED_CONTENT).await?;
        Ok(parsed.embedding.map(|e| e.values).unwrap_or_default())
    }

    /// Run a single-turn generation and return the first candidate's text,
    /// or an empty string when the response carries none.
    pub async fn generate_content(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let body = GenerateContentRequest {
            contents: vec![Content::from_text(prompt)],
        };

        let response = self
            .client
            .post(self.model_url(model, GENERATE_CONTENT))
            .query(&[("key", api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .context("failed to send Gemini generateContent request")?;

        let parsed: GenerateContentResponse = parse_response(response, GENERATE_CONTENT).await?;
        Ok(parsed.first_text().unwrap_or_default())
    }
}

/// Decode a successful JSON body, or turn the provider's error object into
/// an error carrying its message.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);
        return Err(anyhow!("Gemini {operation} failed: {status} - {message}"));
    }
    response
        .json()
        .await
        .with_context(|| format!("failed to parse Gemini {operation} response"))
}

// ── API Types ──────────────────────────────────────────────────────────────

/// One entry of the provider's model catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Fully qualified name, e.g. `models/text-embedding-004`.
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports(&self, method: &str) -> bool {
        self.supported_generation_methods.iter().any(|m| m == method)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn from_text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    #[serde(default)]
    embedding: Option<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}
