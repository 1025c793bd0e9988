use core_config::{ConfigError, FromEnv, env_parse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{CreateQuote, EmbeddingModel, Quote, QuoteQuery, QuoteResults, SearchMode};
use crate::repository::QuoteRepository;

/// Time budgets and result size for [`QuoteService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteServiceConfig {
    /// Budget for a whole `/quotes` request, embedding call included
    pub search_timeout: Duration,
    /// Budget for a single by-id lookup
    pub lookup_timeout: Duration,
    /// K in top-K semantic search
    pub search_limit: usize,
}

impl Default for QuoteServiceConfig {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_millis(3000),
            lookup_timeout: Duration::from_millis(300),
            search_limit: 10,
        }
    }
}

impl FromEnv for QuoteServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let search_timeout_ms: u64 = env_parse("SEARCH_TIMEOUT_MS", "3000")?;
        let lookup_timeout_ms: u64 = env_parse("LOOKUP_TIMEOUT_MS", "300")?;
        let search_limit: usize = env_parse("SEARCH_LIMIT", "10")?;

        if search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SEARCH_LIMIT".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            search_timeout: Duration::from_millis(search_timeout_ms),
            lookup_timeout: Duration::from_millis(lookup_timeout_ms),
            search_limit,
        })
    }
}

/// Search orchestration over a quote store and an embedding provider.
///
/// Every request runs under a deadline. When it expires the in-flight
/// provider call or store query is dropped and the caller gets
/// [`QuoteError::Timeout`].
pub struct QuoteService<R: QuoteRepository> {
    repository: R,
    provider: Arc<dyn EmbeddingProvider>,
    config: QuoteServiceConfig,
}

impl<R: QuoteRepository> QuoteService<R> {
    pub fn new(repository: R, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository,
            provider,
            config: QuoteServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QuoteServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &QuoteServiceConfig {
        &self.config
    }

    /// Model behind every stored and query embedding.
    pub fn provider_model(&self) -> EmbeddingModel {
        self.provider.model()
    }

    /// Run one `/quotes` request along the path `query` selects.
    #[instrument(skip(self), fields(mode = ?query.mode()))]
    pub async fn search(&self, query: QuoteQuery) -> QuoteResult<QuoteResults> {
        let budget = self.config.search_timeout;
        tokio::time::timeout(budget, self.run_search(query))
            .await
            .map_err(|_| {
                warn!(budget_ms = budget.as_millis() as u64, "Search deadline exceeded");
                QuoteError::Timeout(budget)
            })?
    }

    async fn run_search(&self, query: QuoteQuery) -> QuoteResult<QuoteResults> {
        match query {
            QuoteQuery::ByAuthor(author) => {
                let quotes = self.repository.by_author(&author).await?;
                Ok(QuoteResults::unscored(SearchMode::Author, quotes))
            }
            QuoteQuery::Semantic(text) => {
                let vector = self.provider.embed(&text).await?;
                let rows = self
                    .repository
                    .nearest_by_similarity(&vector, self.config.search_limit)
                    .await?;
                Ok(QuoteResults::new(SearchMode::Semantic, rows))
            }
            QuoteQuery::All => {
                let quotes = self.repository.list_all().await?;
                Ok(QuoteResults::unscored(SearchMode::All, quotes))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_quote(&self, id: i64) -> QuoteResult<Quote> {
        let budget = self.config.lookup_timeout;
        tokio::time::timeout(budget, self.repository.get_by_id(id))
            .await
            .map_err(|_| {
                warn!(budget_ms = budget.as_millis() as u64, "Lookup deadline exceeded");
                QuoteError::Timeout(budget)
            })??
            .ok_or(QuoteError::NotFound(id))
    }

    /// Embed and store a new quote.
    ///
    /// A provider failure does not lose the quote: it is stored without an
    /// embedding and a warning is logged.
    #[instrument(skip(self, content))]
    pub async fn ingest(&self, content: &str, author: &str) -> QuoteResult<Quote> {
        if content.is_empty() {
            return Err(QuoteError::Validation(
                "quote content must not be empty".to_string(),
            ));
        }

        let embedding = match self.provider.embed(content).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!(error = %e, "Storing quote without embedding");
                None
            }
        };

        let quote = self
            .repository
            .create(CreateQuote {
                content: content.to_string(),
                author: author.to_string(),
                embedding,
            })
            .await?;
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::error::{ProviderError, StoreError};
    use crate::memory::InMemoryQuoteRepository;
    use crate::models::{QuoteMatch, SearchStatus};
    use crate::repository::MockQuoteRepository;
    use async_trait::async_trait;
    use std::time::Instant;

    fn scenario_store() -> InMemoryQuoteRepository {
        InMemoryQuoteRepository::with_quotes([
            Quote::new(1, "A", "Ada").with_embedding(vec![1.0, 0.0]),
            Quote::new(2, "B", "Bob").with_embedding(vec![0.0, 1.0]),
        ])
    }

    fn fixed_provider(vector: Vec<f32>) -> Arc<dyn EmbeddingProvider> {
        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_embed()
            .returning(move |_| Ok(vector.clone()));
        Arc::new(provider)
    }

    fn unused_provider() -> Arc<dyn EmbeddingProvider> {
        let mut provider = MockEmbeddingProvider::new();
        provider.expect_embed().never();
        Arc::new(provider)
    }

    fn fast(search_ms: u64) -> QuoteServiceConfig {
        QuoteServiceConfig {
            search_timeout: Duration::from_millis(search_ms),
            lookup_timeout: Duration::from_millis(search_ms),
            search_limit: 10,
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl EmbeddingProvider for SlowProvider {
        fn model(&self) -> EmbeddingModel {
            EmbeddingModel::default()
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(vec![1.0, 0.0])
        }
    }

    struct SlowStore;

    #[async_trait]
    impl QuoteRepository for SlowStore {
        async fn list_all(&self) -> Result<Vec<Quote>, StoreError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(vec![])
        }

        async fn by_author(&self, _author: &str) -> Result<Vec<Quote>, StoreError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(vec![])
        }

        async fn nearest_by_similarity(
            &self,
            _query: &[f32],
            _limit: usize,
        ) -> Result<Vec<QuoteMatch>, StoreError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(vec![])
        }

        async fn get_by_id(&self, _id: i64) -> Result<Option<Quote>, StoreError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(None)
        }

        async fn create(&self, _input: CreateQuote) -> Result<Quote, StoreError> {
            unreachable!("not used")
        }
    }

    #[tokio::test]
    async fn test_author_wins_over_query() {
        let mut repository = MockQuoteRepository::new();
        repository
            .expect_by_author()
            .withf(|author| author == "Ada")
            .times(1)
            .returning(|_| Ok(vec![Quote::new(1, "A", "Ada")]));
        repository.expect_nearest_by_similarity().never();
        repository.expect_list_all().never();

        let service = QuoteService::new(repository, unused_provider());
        let results = service
            .search(QuoteQuery::from_params(Some("Ada"), Some("love")))
            .await
            .unwrap();

        assert_eq!(results.mode, SearchMode::Author);
        assert_eq!(results.ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_provider_failure_never_touches_store() {
        let mut provider = MockEmbeddingProvider::new();
        provider.expect_embed().times(1).returning(|_| {
            Err(ProviderError::Unauthorized(
                "401 Unauthorized Incorrect API key".into(),
            ))
        });

        let mut repository = MockQuoteRepository::new();
        repository.expect_nearest_by_similarity().never();

        let service = QuoteService::new(repository, Arc::new(provider));
        let err = service
            .search(QuoteQuery::Semantic("love".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, QuoteError::Provider(ProviderError::Unauthorized(_))));
        assert_eq!(
            err.to_string(),
            "embedding provider rejected credentials: 401 Unauthorized Incorrect API key"
        );
    }

    #[tokio::test]
    async fn test_semantic_passes_limit_and_vector() {
        let mut repository = MockQuoteRepository::new();
        repository
            .expect_nearest_by_similarity()
            .withf(|query, limit| query.to_vec() == vec![0.5f32, 0.5] && *limit == 3)
            .times(1)
            .returning(|_, _| Ok(vec![QuoteMatch::scored(Quote::new(4, "D", "Di"), 0.9)]));

        let service = QuoteService::new(repository, fixed_provider(vec![0.5, 0.5])).with_config(
            QuoteServiceConfig {
                search_limit: 3,
                ..QuoteServiceConfig::default()
            },
        );

        let results = service.search(QuoteQuery::Semantic("x".into())).await.unwrap();
        assert_eq!(results.mode, SearchMode::Semantic);
        assert_eq!(results.rows[0].score, Some(0.9));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let mut repository = MockQuoteRepository::new();
        repository
            .expect_list_all()
            .returning(|| Err(StoreError::ConnectionLost("reset by peer".into())));

        let service = QuoteService::new(repository, unused_provider());
        let err = service.search(QuoteQuery::All).await.unwrap_err();

        assert_eq!(err.to_string(), "quote store connection lost: reset by peer");
    }

    #[tokio::test]
    async fn test_empty_result_is_success() {
        let mut repository = MockQuoteRepository::new();
        repository
            .expect_nearest_by_similarity()
            .returning(|_, _| Ok(vec![]));

        let service = QuoteService::new(repository, fixed_provider(vec![1.0, 0.0]));
        let results = service.search(QuoteQuery::Semantic("x".into())).await.unwrap();

        assert_eq!(results.status(), SearchStatus::Empty);
        assert!(results.rows.is_empty());
    }

    #[tokio::test]
    async fn test_semantic_ranking_on_scenario() {
        let service = QuoteService::new(scenario_store(), fixed_provider(vec![0.1, 0.9]));

        let results = service.search(QuoteQuery::Semantic("b-ish".into())).await.unwrap();

        assert_eq!(results.ids(), vec![2, 1]);
        assert!(results.rows[0].score > results.rows[1].score);
    }

    #[tokio::test]
    async fn test_same_query_same_order() {
        let service = QuoteService::new(
            InMemoryQuoteRepository::with_quotes([
                Quote::new(3, "C", "Cy").with_embedding(vec![1.0, 1.0]),
                Quote::new(1, "A", "Ada").with_embedding(vec![1.0, 1.0]),
                Quote::new(2, "B", "Bob"),
            ]),
            fixed_provider(vec![1.0, 1.0]),
        );

        let first = service.search(QuoteQuery::Semantic("q".into())).await.unwrap();
        let second = service.search(QuoteQuery::Semantic("q".into())).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.ids(), vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let service =
            QuoteService::new(scenario_store(), Arc::new(SlowProvider)).with_config(fast(50));

        let start = Instant::now();
        let err = service
            .search(QuoteQuery::Semantic("slow".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, QuoteError::Timeout(_)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_slow_store_times_out_in_every_mode() {
        let service = QuoteService::new(SlowStore, fixed_provider(vec![1.0])).with_config(fast(50));

        for query in [
            QuoteQuery::All,
            QuoteQuery::ByAuthor("Ada".into()),
            QuoteQuery::Semantic("q".into()),
        ] {
            let start = Instant::now();
            let err = service.search(query).await.unwrap_err();
            assert!(matches!(err, QuoteError::Timeout(_)));
            assert!(start.elapsed() < Duration::from_secs(1));
        }

        let err = service.get_quote(1).await.unwrap_err();
        assert!(matches!(err, QuoteError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_get_quote() {
        let service = QuoteService::new(scenario_store(), unused_provider());

        assert_eq!(service.get_quote(2).await.unwrap().author, "Bob");
        assert!(matches!(
            service.get_quote(42).await,
            Err(QuoteError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_ingest_embeds_content() {
        let service = QuoteService::new(InMemoryQuoteRepository::new(), fixed_provider(vec![0.3, 0.4]));

        let quote = service.ingest("Be yourself", "Wilde").await.unwrap();

        assert_eq!(quote.id, 1);
        assert_eq!(quote.embedding, Some(vec![0.3, 0.4]));
    }

    #[tokio::test]
    async fn test_ingest_keeps_quote_when_provider_fails() {
        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_embed()
            .returning(|_| Err(ProviderError::Unavailable("503".into())));

        let service = QuoteService::new(InMemoryQuoteRepository::new(), Arc::new(provider));
        let quote = service.ingest("Be yourself", "Wilde").await.unwrap();

        assert_eq!(quote.embedding, None);
        assert_eq!(service.search(QuoteQuery::All).await.unwrap().ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_content() {
        let mut repository = MockQuoteRepository::new();
        repository.expect_create().never();

        let service = QuoteService::new(repository, unused_provider());
        assert!(matches!(
            service.ingest("", "Nobody").await,
            Err(QuoteError::Validation(_))
        ));
    }

    #[test]
    fn test_reports_config_and_model() {
        let mut provider = MockEmbeddingProvider::new();
        provider
            .expect_model()
            .return_const(EmbeddingModel::TextEmbedding3Large);

        let service = QuoteService::new(InMemoryQuoteRepository::new(), Arc::new(provider))
            .with_config(fast(120));

        assert_eq!(service.config().search_limit, 10);
        assert_eq!(service.config().search_timeout, Duration::from_millis(120));
        assert_eq!(service.provider_model().dimension(), 3072);
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("SEARCH_TIMEOUT_MS", Some("1500")),
                ("LOOKUP_TIMEOUT_MS", None),
                ("SEARCH_LIMIT", Some("5")),
            ],
            || {
                let config = QuoteServiceConfig::from_env().unwrap();
                assert_eq!(config.search_timeout, Duration::from_millis(1500));
                assert_eq!(config.lookup_timeout, Duration::from_millis(300));
                assert_eq!(config.search_limit, 5);
            },
        );
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        temp_env::with_var("SEARCH_LIMIT", Some("0"), || {
            assert!(matches!(
                QuoteServiceConfig::from_env(),
                Err(ConfigError::InvalidValue { .. })
            ));
        });
    }
}
