use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{CreateQuote, Quote, QuoteMatch};

/// Persistence for quotes and their embeddings.
///
/// Listings are ordered by ascending id. Implementations are shared across
/// request tasks and must never expose a partially written quote.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Quote>, StoreError>;

    /// Exact, case-sensitive match. An empty `author` matches only quotes
    /// stored with an empty author.
    async fn by_author(&self, author: &str) -> Result<Vec<Quote>, StoreError>;

    /// The `limit` quotes most similar to `query` by cosine similarity.
    ///
    /// Descending score, ties on ascending id. Quotes without a usable
    /// embedding come after every scored quote, with no score.
    async fn nearest_by_similarity(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<QuoteMatch>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Quote>, StoreError>;

    async fn create(&self, input: CreateQuote) -> Result<Quote, StoreError>;
}
