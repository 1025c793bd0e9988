//! PostgreSQL connectivity shared by the services in this workspace.
//!
//! - [`postgres::PostgresConfig`]: pool settings from `DATABASE_URL` or the
//!   `POSTGRES_*` parts
//! - [`postgres::connect_from_config_with_retry`]: connect with exponential backoff
//! - [`postgres::check_health`]: `SELECT 1` readiness probe
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{PostgresConfig, connect_from_config_with_retry};
//! use database::common::RetryConfig;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = connect_from_config_with_retry(config, Some(RetryConfig::new().with_max_retries(5))).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
