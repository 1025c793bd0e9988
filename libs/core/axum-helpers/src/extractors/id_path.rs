//! Integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

pub const INVALID_ID_MESSAGE: &str = "id must be an integer";

/// Extractor for a single `i64` path parameter.
///
/// Anything that does not parse as a signed 64-bit integer is rejected with
/// the standard error payload `{"error": "id must be an integer"}`.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::IdPath;
///
/// async fn get_quote(IdPath(id): IdPath) -> String {
///     format!("quote {id}")
/// }
///
/// let app = Router::new().route("/quote/{id}", get(get_quote));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| AppError::BadRequest(INVALID_ID_MESSAGE.to_string()).into_response())
    }
}
