use serde::{Deserialize, Serialize};

/// A stored quote.
///
/// `embedding` is `None` when the provider could not embed the content at
/// ingest time. Such quotes are still listed and filtered by author, and rank
/// last in semantic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub content: String,
    pub author: String,
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

impl Quote {
    pub fn new(id: i64, content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            author: author.into(),
            embedding: None,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Input for inserting a quote. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateQuote {
    pub content: String,
    pub author: String,
    pub embedding: Option<Vec<f32>>,
}

/// A quote together with its similarity to the query, when one was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMatch {
    #[serde(flatten)]
    pub quote: Quote,
    /// Cosine similarity in `[-1, 1]`; absent for author/all listings and
    /// for quotes without a usable embedding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl QuoteMatch {
    pub fn unscored(quote: Quote) -> Self {
        Self { quote, score: None }
    }

    pub fn scored(quote: Quote, score: f32) -> Self {
        Self {
            quote,
            score: Some(score),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Author,
    Semantic,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Success,
    /// No rows matched. Not an error.
    Empty,
}

/// Outcome of one `/quotes` request, whichever path produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResults {
    pub mode: SearchMode,
    pub rows: Vec<QuoteMatch>,
}

impl QuoteResults {
    pub fn new(mode: SearchMode, rows: Vec<QuoteMatch>) -> Self {
        Self { mode, rows }
    }

    pub fn unscored(mode: SearchMode, quotes: Vec<Quote>) -> Self {
        Self::new(mode, quotes.into_iter().map(QuoteMatch::unscored).collect())
    }

    pub fn status(&self) -> SearchStatus {
        if self.rows.is_empty() {
            SearchStatus::Empty
        } else {
            SearchStatus::Success
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        self.rows.iter().map(|m| m.quote.id).collect()
    }
}

/// Which retrieval path a `/quotes` request takes.
///
/// | author    | query     | path         |
/// |-----------|-----------|--------------|
/// | non-empty | any       | `ByAuthor`   |
/// | empty     | non-empty | `Semantic`   |
/// | empty     | empty     | `All`        |
///
/// Absent and empty parameters are the same. Values are not trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteQuery {
    ByAuthor(String),
    Semantic(String),
    All,
}

impl QuoteQuery {
    pub fn from_params(author: Option<&str>, query: Option<&str>) -> Self {
        let author = author.filter(|a| !a.is_empty());
        let query = query.filter(|q| !q.is_empty());

        match (author, query) {
            (Some(author), _) => QuoteQuery::ByAuthor(author.to_string()),
            (None, Some(query)) => QuoteQuery::Semantic(query.to_string()),
            (None, None) => QuoteQuery::All,
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            QuoteQuery::ByAuthor(_) => SearchMode::Author,
            QuoteQuery::Semantic(_) => SearchMode::Semantic,
            QuoteQuery::All => SearchMode::All,
        }
    }
}

/// Supported embedding models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmbeddingModel {
    /// text-embedding-ada-002 (1536 dimensions)
    #[default]
    TextEmbeddingAda002,
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
}

impl EmbeddingModel {
    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingModel::TextEmbeddingAda002 => 1536,
            EmbeddingModel::TextEmbedding3Small => 1536,
            EmbeddingModel::TextEmbedding3Large => 3072,
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::TextEmbeddingAda002 => "text-embedding-ada-002",
            EmbeddingModel::TextEmbedding3Small => "text-embedding-3-small",
            EmbeddingModel::TextEmbedding3Large => "text-embedding-3-large",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            EmbeddingModel::TextEmbeddingAda002,
            EmbeddingModel::TextEmbedding3Small,
            EmbeddingModel::TextEmbedding3Large,
        ]
        .into_iter()
        .find(|m| m.model_name() == name)
    }
}
