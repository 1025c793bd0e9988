//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`http`]**: CORS allow-list layer
//! - **[`errors`]**: `{"error": "..."}` payloads and the fallback handler
//! - **[`extractors`]**: integer path parameters
//! - **[`server`]**: server start, readiness checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::{CorsConfig, cors_layer, create_app};
//! use core_config::{FromEnv, server::ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let cors = cors_layer(&CorsConfig::from_env()?)?;
//!     let router = Router::new().layer(cors);
//!     create_app(router, &ServerConfig::from_env()?).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorResponse};
pub use extractors::IdPath;
pub use http::{CorsConfig, cors_layer};
pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_app, run_health_checks, shutdown_signal,
};
