//! Process bootstrap: configuration, connections and the HTTP server.

use std::sync::Arc;

use axum_helpers::{cors_layer, create_app, errors::handlers::not_found};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{DatabaseConnection, connect_from_config_with_retry};
use domain_quotes::{OpenAIProvider, PgQuoteRepository, QuoteService};
use eyre::{Result, WrapErr};
use observability::MetricsContext;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api;
use crate::config::Config;

/// Run the quotes API until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if configuration is invalid, PostgreSQL stays
/// unreachable after the connect retries, or the server fails to bind.
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    let (db, service) = connect_service(&config).await?;
    info!(
        model = service.provider_model().model_name(),
        dimension = service.provider_model().dimension(),
        search_limit = service.config().search_limit,
        "Starting quotes API"
    );

    let metrics = MetricsContext::new().wrap_err("Failed to create metrics recorder")?;
    let cors = cors_layer(&config.cors).wrap_err("Invalid CORS configuration")?;

    let app = api::routes(service, &metrics, cors)
        .merge(api::ready_router(db.clone()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    create_app(app, &config.server)
        .await
        .wrap_err("Server error")?;

    match db.close().await {
        Ok(()) => info!("PostgreSQL connection closed"),
        Err(e) => error!("Error closing PostgreSQL: {}", e),
    }

    info!("Quotes API shutdown complete");
    Ok(())
}

/// Connect to PostgreSQL and build the Postgres-backed quote service.
pub(crate) async fn connect_service(
    config: &Config,
) -> Result<(DatabaseConnection, QuoteService<PgQuoteRepository>)> {
    let db = connect_from_config_with_retry(config.database.clone(), Some(config.retry.clone()))
        .await
        .wrap_err("Failed to connect to PostgreSQL")?;

    let provider =
        OpenAIProvider::new(config.openai.clone()).wrap_err("Failed to create embedding provider")?;
    let service = QuoteService::new(PgQuoteRepository::new(db.clone()), Arc::new(provider))
        .with_config(config.search.clone());

    Ok((db, service))
}
