pub mod handlers;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload returned by every handler.
///
/// ```json
/// { "error": "id must be an integer" }
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Failures are reported in the body, not the status line: every variant
/// renders as `200 OK` with an [`ErrorResponse`]. Clients of these services
/// branch on the presence of the `error` key. The variant only decides how
/// loudly the failure is logged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl AppError {
    /// Status this error would carry under conventional REST semantics.
    /// Used as a log field only.
    pub fn semantic_status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let semantic = self.semantic_status().as_u16();
        match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                tracing::info!(semantic_status = semantic, "Request rejected: {}", msg);
            }
            AppError::Timeout(msg)
            | AppError::BadGateway(msg)
            | AppError::ServiceUnavailable(msg) => {
                tracing::warn!(semantic_status = semantic, "Upstream failure: {}", msg);
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(semantic_status = semantic, "Internal error: {}", msg);
            }
        }

        (StatusCode::OK, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(error: AppError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_every_variant_renders_200_with_error_key() {
        let cases = [
            AppError::BadRequest("bad".into()),
            AppError::NotFound("missing".into()),
            AppError::Timeout("slow".into()),
            AppError::BadGateway("upstream".into()),
            AppError::ServiceUnavailable("down".into()),
            AppError::InternalServerError("boom".into()),
        ];

        for error in cases {
            let expected = error.to_string();
            let (status, body) = body_of(error).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, ErrorResponse::new(expected));
        }
    }

    #[tokio::test]
    async fn test_message_is_verbatim() {
        let (_, body) = body_of(AppError::BadGateway("provider unauthorized: 401".into())).await;
        assert_eq!(body.error, "provider unauthorized: 401");
    }

    #[test]
    fn test_semantic_status() {
        assert_eq!(
            AppError::Timeout("x".into()).semantic_status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::BadRequest("x".into()).semantic_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
