use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use reqwest::StatusCode;
use sea_orm::{ConnAcquireErr, DbErr};
use std::time::Duration;
use thiserror::Error;

/// Failures of the embedding provider call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("embedding provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("no embeddings returned")]
    EmptyResult,

    #[error("embedding request timed out")]
    Timeout,

    /// Non-auth 4xx such as an unknown model or oversized input
    #[error("embedding request rejected: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// Transient failures a caller could retry. Nothing in this crate does.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_) | ProviderError::Timeout)
    }

    /// Classify a non-success HTTP answer.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = format!("{} {}", status, body.trim());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(detail),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::Unavailable(detail),
            s if s.is_server_error() => ProviderError::Unavailable(detail),
            _ => ProviderError::Rejected(detail),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::MalformedResponse(err.to_string())
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}

/// Failures of the quote store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("quote store connection lost: {0}")]
    ConnectionLost(String),

    #[error("quote store timed out")]
    Timeout,

    #[error("malformed quote row: {0}")]
    MalformedRow(String),

    /// Statement rejected by the database, e.g. missing pgvector extension
    #[error("quote store query failed: {0}")]
    Query(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => StoreError::Timeout,
            DbErr::ConnectionAcquire(e) => StoreError::ConnectionLost(e.to_string()),
            DbErr::Conn(e) => StoreError::ConnectionLost(e.to_string()),
            DbErr::Type(msg) => StoreError::MalformedRow(msg),
            other => StoreError::Query(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Validation(String),

    #[error("quote {0} not found")]
    NotFound(i64),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type QuoteResult<T> = Result<T, QuoteError>;

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        let message = err.to_string();
        match err {
            QuoteError::Provider(ProviderError::Timeout) => AppError::Timeout(message),
            QuoteError::Provider(_) => AppError::BadGateway(message),
            QuoteError::Store(StoreError::Timeout) => AppError::Timeout(message),
            QuoteError::Store(StoreError::ConnectionLost(_)) => AppError::ServiceUnavailable(message),
            QuoteError::Store(_) => AppError::InternalServerError(message),
            QuoteError::Validation(_) => AppError::BadRequest(message),
            QuoteError::NotFound(_) => AppError::NotFound(message),
            QuoteError::Timeout(_) => AppError::Timeout(message),
            QuoteError::Config(_) => AppError::InternalServerError(message),
        }
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
