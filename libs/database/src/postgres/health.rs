use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` against the pool. Used by `/ready`.
pub async fn check_health<C>(db: &C) -> Result<(), DatabaseError>
where
    C: ConnectionTrait,
{
    debug!("Running PostgreSQL health check");

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
    db.query_one_raw(stmt).await.map_err(|e| {
        DatabaseError::HealthCheckFailed(e.to_string())
    })?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
