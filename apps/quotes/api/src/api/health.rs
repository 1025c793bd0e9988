use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::postgres::{DatabaseConnection, check_health};

/// Readiness check that actually queries PostgreSQL.
pub async fn ready_handler(State(db): State<DatabaseConnection>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            check_health(&db)
                .await
                .map_err(|e| format!("Database health check failed: {e}"))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
