use axum::{Json, Router, middleware, routing::get};
use domain_quotes::{QuoteRepository, QuoteService};
use observability::{MetricsContext, hit_counter, latency_recorder, metrics_handler};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub mod health;

/// Creates the application routes.
///
/// The quote routes (`/quotes`, `/quote/{id}`, `/page/`) run behind
/// CORS → hit counter → latency recorder, outermost first. `/` and
/// `/metrics` are not instrumented.
pub fn routes<R: QuoteRepository + 'static>(
    service: QuoteService<R>,
    metrics: &MetricsContext,
    cors: CorsLayer,
) -> Router {
    let instrumented = domain_quotes::router(service).route_layer(
        ServiceBuilder::new()
            .layer(cors)
            .layer(middleware::from_fn_with_state(metrics.clone(), hit_counter))
            .layer(middleware::from_fn_with_state(metrics.clone(), latency_recorder)),
    );

    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics_handler).with_state(metrics.clone()))
        .merge(instrumented)
}

/// Creates a router with the /ready endpoint that pings the database.
pub fn ready_router(db: database::postgres::DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(db)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hola Mundo" }))
}
