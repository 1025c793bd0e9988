//! PostgreSQL + pgvector quote store.
//!
//! Expects:
//!
//! ```sql
//! CREATE EXTENSION IF NOT EXISTS vector;
//! CREATE TABLE quotes (
//!     id        BIGSERIAL PRIMARY KEY,
//!     content   TEXT NOT NULL,
//!     author    TEXT NOT NULL DEFAULT '',
//!     embedding vector(1536)
//! );
//! ```
//!
//! Vectors cross the wire as pgvector text literals (`[0.1,0.2,...]`), so no
//! pgvector-specific driver support is needed.

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, QueryResult, Statement,
};
use tracing::warn;

use crate::error::StoreError;
use crate::models::{CreateQuote, Quote, QuoteMatch};
use crate::repository::QuoteRepository;

const SELECT_QUOTE: &str = "SELECT id, content, author, embedding::text AS embedding FROM quotes";

/// PostgreSQL implementation of QuoteRepository
#[derive(Clone)]
pub struct PgQuoteRepository {
    db: DatabaseConnection,
}

impl PgQuoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn query_quotes(&self, stmt: Statement) -> Result<Vec<Quote>, StoreError> {
        let rows = self.db.query_all_raw(stmt).await?;
        Ok(rows.iter().filter_map(decode_or_skip::<QuoteRow>).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct QuoteRow {
    id: i64,
    content: String,
    author: String,
    embedding: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct ScoredQuoteRow {
    id: i64,
    content: String,
    author: String,
    embedding: Option<String>,
    score: Option<f64>,
}

impl QuoteRow {
    fn into_quote(self) -> Result<Quote, StoreError> {
        Ok(Quote {
            id: self.id,
            content: self.content,
            author: self.author,
            embedding: self.embedding.as_deref().map(parse_vector).transpose()?,
        })
    }
}

impl ScoredQuoteRow {
    fn into_match(self) -> Result<QuoteMatch, StoreError> {
        // NULL embeddings and zero vectors produce NULL/NaN distances.
        let score = self
            .score
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(-1.0, 1.0) as f32);

        let quote = QuoteRow {
            id: self.id,
            content: self.content,
            author: self.author,
            embedding: self.embedding,
        }
        .into_quote()?;

        Ok(QuoteMatch { quote, score })
    }
}

/// Decode one row, logging and skipping it when it is malformed.
fn decode_or_skip<R>(row: &QueryResult) -> Option<<R as Decoded>::Output>
where
    R: Decoded,
{
    match R::decode(row) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Skipping malformed quote row");
            None
        }
    }
}

trait Decoded {
    type Output;
    fn decode(row: &QueryResult) -> Result<Self::Output, StoreError>;
}

impl Decoded for QuoteRow {
    type Output = Quote;

    fn decode(row: &QueryResult) -> Result<Quote, StoreError> {
        let row = QuoteRow::from_query_result(row, "")
            .map_err(|e| StoreError::MalformedRow(e.to_string()))?;
        row.into_quote()
    }
}

impl Decoded for ScoredQuoteRow {
    type Output = QuoteMatch;

    fn decode(row: &QueryResult) -> Result<QuoteMatch, StoreError> {
        let row = ScoredQuoteRow::from_query_result(row, "")
            .map_err(|e| StoreError::MalformedRow(e.to_string()))?;
        row.into_match()
    }
}

/// Render a vector as a pgvector literal.
pub fn vector_literal(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(f32::to_string).collect();
    format!("[{}]", parts.join(","))
}

/// Parse a pgvector text literal.
pub fn parse_vector(literal: &str) -> Result<Vec<f32>, StoreError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| StoreError::MalformedRow(format!("not a vector literal: {literal}")))?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| StoreError::MalformedRow(format!("bad vector component '{part}': {e}")))
        })
        .collect()
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    async fn list_all(&self) -> Result<Vec<Quote>, StoreError> {
        let sql = format!("{SELECT_QUOTE} ORDER BY id ASC");
        let stmt = Statement::from_string(DbBackend::Postgres, sql);
        self.query_quotes(stmt).await
    }

    async fn by_author(&self, author: &str) -> Result<Vec<Quote>, StoreError> {
        let sql = format!("{SELECT_QUOTE} WHERE author = $1 ORDER BY id ASC");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [author.into()]);
        self.query_quotes(stmt).await
    }

    async fn nearest_by_similarity(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<QuoteMatch>, StoreError> {
        // Rows whose dimension differs from the query get a NULL score
        // instead of failing the whole statement.
        let sql = r#"
            SELECT id, content, author, embedding::text AS embedding,
                   CASE WHEN vector_dims(embedding) = vector_dims($1::vector)
                        THEN 1 - (embedding <=> $1::vector)
                   END AS score
            FROM quotes
            ORDER BY score DESC NULLS LAST, id ASC
            LIMIT $2
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [vector_literal(query).into(), (limit as i64).into()],
        );

        let rows = self.db.query_all_raw(stmt).await?;
        Ok(rows
            .iter()
            .filter_map(decode_or_skip::<ScoredQuoteRow>)
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Quote>, StoreError> {
        let sql = format!("{SELECT_QUOTE} WHERE id = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        match self.db.query_one_raw(stmt).await? {
            Some(row) => QuoteRow::decode(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, input: CreateQuote) -> Result<Quote, StoreError> {
        let sql = r#"
            INSERT INTO quotes (content, author, embedding)
            VALUES ($1, $2, $3::vector)
            RETURNING id, content, author, embedding::text AS embedding
        "#;

        let embedding = input.embedding.as_deref().map(vector_literal);
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [input.content.into(), input.author.into(), embedding.into()],
        );

        let row = self
            .db
            .query_one_raw(stmt)
            .await?
            .ok_or_else(|| StoreError::Query("insert returned no row".to_string()))?;
        QuoteRow::decode(&row)
    }
}
