//! Axum middlewares that record one observation per completed request.
//!
//! [`hit_counter`] and [`latency_recorder`] are independent recording points.
//! Each reads the status of the response that actually left the inner
//! service (200 unless a handler set something else), so when both wrap the
//! same route they always agree on the observed status.

use axum::{
    extract::{MatchedPath, Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{Key, Label};
use std::time::Instant;

use crate::MetricsContext;

/// Labels attached to every request metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestObservation {
    pub method: String,
    pub endpoint: String,
    pub status: String,
}

impl RequestObservation {
    pub fn new(method: &Method, endpoint: impl Into<String>, status: StatusCode) -> Self {
        Self {
            method: method.as_str().to_string(),
            endpoint: endpoint.into(),
            status: status_label(status),
        }
    }

    pub(crate) fn key(&self, name: &'static str) -> Key {
        Key::from_parts(
            name,
            vec![
                Label::new("method", self.method.clone()),
                Label::new("endpoint", self.endpoint.clone()),
                Label::new("status", self.status.clone()),
            ],
        )
    }
}

/// Reason phrase ("OK", "Not Found"), or the bare code for unregistered statuses.
pub fn status_label(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

// Route template when routing matched, raw path otherwise.
fn endpoint_of(matched_path: Option<MatchedPath>, request: &Request) -> String {
    matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Increments `http_requests_total{method, endpoint, status}`.
pub async fn hit_counter(
    State(metrics): State<MetricsContext>,
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let endpoint = endpoint_of(matched_path, &request);

    let response = next.run(request).await;

    metrics.record_hit(&RequestObservation::new(&method, endpoint, response.status()));
    response
}

/// Observes `http_request_duration_seconds{method, endpoint, status}`.
pub async fn latency_recorder(
    State(metrics): State<MetricsContext>,
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let endpoint = endpoint_of(matched_path, &request);

    let response = next.run(request).await;

    let observation = RequestObservation::new(&method, endpoint, response.status());
    metrics.record_latency(&observation, start.elapsed());
    response
}
