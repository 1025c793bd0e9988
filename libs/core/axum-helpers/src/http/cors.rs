use axum::http::{HeaderValue, Method};
use core_config::{ConfigError, FromEnv, env_or_default};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost";

/// Methods advertised to allowed origins.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::PUT,
    Method::DELETE,
    Method::POST,
    Method::GET,
    Method::OPTIONS,
];

/// Origins allowed to make cross-origin requests.
///
/// Matching is exact: scheme, host and port must all agree with the
/// `Origin` header the browser sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: origins.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::new([DEFAULT_ALLOWED_ORIGIN])
    }
}

impl FromEnv for CorsConfig {
    /// Reads comma-separated `CORS_ALLOWED_ORIGIN`, e.g.
    /// `http://localhost:3000,https://quotes.example.com`.
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("CORS_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN);

        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "at least one origin is required".to_string(),
            });
        }

        Ok(Self::new(origins))
    }
}

/// Build the CORS layer for `config`.
///
/// Preflight (`OPTIONS`) requests are answered here with 200 and never reach
/// inner layers or handlers. Responses to origins outside the allow-list
/// carry no `Access-Control-Allow-Origin` header.
///
/// # Errors
/// Returns [`ConfigError::InvalidValue`] when an origin is not a valid
/// header value.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "CORS_ALLOWED_ORIGIN".to_string(),
                    details: format!("{origin}: {e}"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(origins = ?config.allowed_origins, "CORS configured");

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(ALLOWED_METHODS))
}
