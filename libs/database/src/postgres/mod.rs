//! PostgreSQL pool configuration, connection and health checks.

mod config;
mod connector;
mod health;

pub use config::{PostgresConfig, PostgresUrlParts};
pub use connector::{connect_from_config, connect_from_config_with_retry, connect_with_options};
pub use health::check_health;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
