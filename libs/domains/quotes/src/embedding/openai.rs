use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::EmbeddingProvider;
use crate::error::{ProviderError, QuoteError, QuoteResult};
use crate::models::EmbeddingModel;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI embedding provider configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: EmbeddingModel,
    /// Transport-level cap on one embeddings call
    pub request_timeout: Duration,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: EmbeddingModel::default(),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: EmbeddingModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl FromEnv for OpenAIConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("OPENAI_API_KEY")?;
        let base_url = env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL);

        let model_name = env_or_default("EMBEDDING_MODEL", EmbeddingModel::default().model_name());
        let model =
            EmbeddingModel::from_name(&model_name).ok_or_else(|| ConfigError::InvalidValue {
                key: "EMBEDDING_MODEL".to_string(),
                details: format!("unsupported model '{model_name}'"),
            })?;

        let timeout_ms: u64 = env_parse("EMBEDDING_REQUEST_TIMEOUT_MS", "10000")?;

        Ok(Self::new(api_key)
            .with_base_url(base_url.trim_end_matches('/'))
            .with_model(model)
            .with_request_timeout(Duration::from_millis(timeout_ms)))
    }
}

/// OpenAI embeddings provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> QuoteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| QuoteError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    total_tokens: u32,
}

/// Decode an embeddings response body and check its dimension.
fn decode_embedding(body: &[u8], model: EmbeddingModel) -> Result<Vec<f32>, ProviderError> {
    let response: EmbeddingResponse = serde_json::from_slice(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    if let Some(usage) = &response.usage {
        debug!(total_tokens = usage.total_tokens, "Embedding usage");
    }

    let embedding = response
        .data
        .into_iter()
        .min_by_key(|d| d.index)
        .ok_or(ProviderError::EmptyResult)?
        .embedding;

    if embedding.len() != model.dimension() {
        return Err(ProviderError::MalformedResponse(format!(
            "expected {} dimensions for {}, got {}",
            model.dimension(),
            model.model_name(),
            embedding.len()
        )));
    }

    Ok(embedding)
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model(&self) -> EmbeddingModel {
        self.config.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbeddingRequest {
            input: text,
            model: self.config.model.model_name(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, &body));
        }

        let body = response.bytes().await?;
        decode_embedding(&body, self.config.model)
    }
}
