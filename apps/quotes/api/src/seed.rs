//! Bulk quote loading for a fresh database.
//!
//! Accepts either a bare JSON array of quotes or the `{"quotes": [...]}`
//! envelope returned by dummyjson.com. Each entry needs `content` (or
//! `quote`) and may carry `author`.

use std::path::Path;

use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_quotes::{QuoteRepository, QuoteService};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::server::connect_service;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedQuote {
    #[serde(alias = "quote")]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    List(Vec<SeedQuote>),
    Wrapped { quotes: Vec<SeedQuote> },
}

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub stored: usize,
    /// Stored, but the provider failed so the row has no embedding
    pub without_embedding: usize,
    pub failed: usize,
}

pub fn parse_seed(raw: &str) -> serde_json::Result<Vec<SeedQuote>> {
    Ok(match serde_json::from_str(raw)? {
        SeedFile::List(quotes) => quotes,
        SeedFile::Wrapped { quotes } => quotes,
    })
}

/// Ingest every quote in order. A failing entry is logged and skipped.
pub async fn seed<R: QuoteRepository>(
    service: &QuoteService<R>,
    quotes: Vec<SeedQuote>,
) -> SeedSummary {
    let mut summary = SeedSummary::default();

    for (index, quote) in quotes.into_iter().enumerate() {
        match service.ingest(&quote.content, &quote.author).await {
            Ok(stored) => {
                summary.stored += 1;
                if stored.embedding.is_none() {
                    summary.without_embedding += 1;
                }
            }
            Err(e) => {
                warn!(index, error = %e, "Skipping quote");
                summary.failed += 1;
            }
        }
    }

    summary
}

async fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .wrap_err("Failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Load quotes from `input` (stdin when `None`) into PostgreSQL.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the input cannot be read
/// or parsed, or PostgreSQL stays unreachable after the connect retries.
pub async fn run(input: Option<&Path>) -> Result<SeedSummary> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    let raw = read_input(input).await?;
    let quotes = parse_seed(&raw).wrap_err("Seed input is not a quote list")?;

    let (db, service) = connect_service(&config).await?;
    info!(
        count = quotes.len(),
        model = service.provider_model().model_name(),
        "Seeding quotes"
    );

    let summary = seed(&service, quotes).await;
    info!(
        stored = summary.stored,
        without_embedding = summary.without_embedding,
        failed = summary.failed,
        "Finished seeding"
    );

    if let Err(e) = db.close().await {
        error!("Error closing PostgreSQL: {}", e);
    }

    Ok(summary)
}
