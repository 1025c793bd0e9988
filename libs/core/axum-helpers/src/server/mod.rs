//! Server infrastructure module.
//!
//! - Server start with graceful shutdown
//! - Readiness check aggregation
//! - Shutdown signal coordination

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::create_app;
pub use health::{HealthCheckFuture, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
