use axum_helpers::CorsConfig;
use core_config::{ConfigError, FromEnv, server::ServerConfig};
use database::RetryConfig;
use database::postgres::PostgresConfig;
use domain_quotes::{OpenAIConfig, QuoteServiceConfig};

pub use core_config::Environment;

/// Application configuration
/// Composes the shared config components of each library
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub retry: RetryConfig,
    pub openai: OpenAIConfig,
    pub search: QuoteServiceConfig,
    pub cors: CorsConfig,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?, // HOST=0.0.0.0, PORT=8080
            database: PostgresConfig::from_env()?,
            retry: RetryConfig::from_env()?,
            openai: OpenAIConfig::from_env()?, // OPENAI_API_KEY is required
            search: QuoteServiceConfig::from_env()?,
            cors: CorsConfig::from_env()?,
        })
    }
}
