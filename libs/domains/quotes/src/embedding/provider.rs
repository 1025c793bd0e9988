use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::EmbeddingModel;

/// Turns text into a fixed-dimension vector via an external service.
///
/// One call is one outbound request: no caching, batching or retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model whose dimension every returned vector has
    fn model(&self) -> EmbeddingModel;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}
