//! In-process quote store.
//!
//! Used by tests and local runs without PostgreSQL. Rows live behind a
//! `std::sync::RwLock`; the lock is never held across an await.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::models::{CreateQuote, Quote, QuoteMatch};
use crate::repository::QuoteRepository;
use crate::similarity;

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    quotes: RwLock<Vec<Quote>>,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing quotes, keeping their ids.
    pub fn with_quotes(quotes: impl IntoIterator<Item = Quote>) -> Self {
        let mut quotes: Vec<Quote> = quotes.into_iter().collect();
        quotes.sort_by_key(|q| q.id);
        Self {
            quotes: RwLock::new(quotes),
        }
    }

    fn snapshot(&self) -> Result<Vec<Quote>, StoreError> {
        self.quotes
            .read()
            .map(|quotes| quotes.clone())
            .map_err(|_| StoreError::ConnectionLost("quote store lock poisoned".to_string()))
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn list_all(&self) -> Result<Vec<Quote>, StoreError> {
        self.snapshot()
    }

    async fn by_author(&self, author: &str) -> Result<Vec<Quote>, StoreError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|q| q.author == author)
            .collect())
    }

    async fn nearest_by_similarity(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<QuoteMatch>, StoreError> {
        Ok(similarity::rank(query, self.snapshot()?, limit))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Quote>, StoreError> {
        Ok(self.snapshot()?.into_iter().find(|q| q.id == id))
    }

    async fn create(&self, input: CreateQuote) -> Result<Quote, StoreError> {
        let mut quotes = self
            .quotes
            .write()
            .map_err(|_| StoreError::ConnectionLost("quote store lock poisoned".to_string()))?;

        let id = quotes.last().map_or(1, |q| q.id + 1);
        let quote = Quote {
            id,
            content: input.content,
            author: input.author,
            embedding: input.embedding,
        };
        quotes.push(quote.clone());
        Ok(quote)
    }
}
