//! Quotes Domain Library
//!
//! Semantic and author search over a collection of quotes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   QuoteService   │  ← precedence, deadlines, ingest
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐     ┌───────────────────┐
//! │ QuoteRepository  │     │ EmbeddingProvider │
//! │     (trait)      │     │      (trait)      │
//! └────────┬─────────┘     └────────┬──────────┘
//!          │                        │
//! ┌────────▼─────────┐     ┌────────▼──────────┐
//! │ PgQuoteRepository│     │  OpenAIProvider   │
//! │ InMemory...      │     └───────────────────┘
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_quotes::{
//!     InMemoryQuoteRepository, OpenAIConfig, OpenAIProvider, QuoteQuery, QuoteService,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OpenAIProvider::new(OpenAIConfig::from_env()?)?;
//! let service = QuoteService::new(InMemoryQuoteRepository::new(), Arc::new(provider));
//!
//! service.ingest("Simplicity is prerequisite for reliability.", "Dijkstra").await?;
//! let results = service
//!     .search(QuoteQuery::from_params(None, Some("keep it simple")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod similarity;

pub use embedding::{EmbeddingProvider, OpenAIConfig, OpenAIProvider};
pub use error::{ProviderError, QuoteError, QuoteResult, StoreError};
pub use handlers::router;
pub use memory::InMemoryQuoteRepository;
pub use models::{
    CreateQuote, EmbeddingModel, Quote, QuoteMatch, QuoteQuery, QuoteResults, SearchMode,
    SearchStatus,
};
pub use postgres::PgQuoteRepository;
pub use repository::QuoteRepository;
pub use service::{QuoteService, QuoteServiceConfig};
