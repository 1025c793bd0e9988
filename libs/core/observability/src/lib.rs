//! Request metrics for HTTP services.
//!
//! Metrics live in an explicitly constructed [`MetricsContext`] rather than
//! a process-wide recorder: the application builds one at startup and hands
//! clones to the recording middlewares and to the `/metrics` handler. Tests
//! build a fresh context each, so observations never leak between them.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::get};
//! use observability::{MetricsContext, hit_counter, latency_recorder, metrics_handler};
//!
//! let metrics = MetricsContext::new()?;
//! let app = Router::new()
//!     .route("/quotes", get(handler))
//!     .route_layer(middleware::from_fn_with_state(metrics.clone(), latency_recorder))
//!     .route_layer(middleware::from_fn_with_state(metrics.clone(), hit_counter))
//!     .route("/metrics", get(metrics_handler).with_state(metrics));
//! ```

pub mod middleware;

pub use middleware::{hit_counter, latency_recorder, RequestObservation};

use axum::extract::State;
use metrics::{Level, Metadata, Recorder, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Latency buckets in seconds, matching the Prometheus client defaults.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Shared, accumulate-only request metrics.
///
/// Cloning is cheap; all clones record into the same registry. Counters and
/// histograms are updated atomically, so concurrent request tasks need no
/// external locking.
#[derive(Clone)]
pub struct MetricsContext {
    inner: Arc<Inner>,
}

struct Inner {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl MetricsContext {
    /// Build a recorder that is *not* installed globally.
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                &DEFAULT_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        recorder.describe_counter(
            HTTP_REQUESTS_TOTAL.into(),
            None,
            "Number of HTTP requests processed".into(),
        );
        recorder.describe_histogram(
            HTTP_REQUEST_DURATION_SECONDS.into(),
            Some(Unit::Seconds),
            "Histogram of latencies for HTTP requests".into(),
        );

        debug!("Metrics context created");

        Ok(Self {
            inner: Arc::new(Inner { recorder, handle }),
        })
    }

    /// Count one completed request.
    pub fn record_hit(&self, observation: &RequestObservation) {
        self.inner
            .recorder
            .register_counter(&observation.key(HTTP_REQUESTS_TOTAL), &metadata())
            .increment(1);
    }

    /// Observe how long one completed request took.
    pub fn record_latency(&self, observation: &RequestObservation, elapsed: Duration) {
        self.inner
            .recorder
            .register_histogram(&observation.key(HTTP_REQUEST_DURATION_SECONDS), &metadata())
            .record(elapsed.as_secs_f64());
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.inner.handle.render()
    }
}

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}

/// Axum handler for `/metrics`
pub async fn metrics_handler(State(metrics): State<MetricsContext>) -> String {
    metrics.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};

    fn observation(status: StatusCode) -> RequestObservation {
        RequestObservation::new(&Method::GET, "/quotes", status)
    }

    #[test]
    fn test_fresh_context_has_no_samples() {
        let metrics = MetricsContext::new().unwrap();
        assert!(!metrics.render().contains("http_requests_total{"));
    }

    #[test]
    fn test_contexts_are_isolated() {
        let first = MetricsContext::new().unwrap();
        let second = MetricsContext::new().unwrap();

        first.record_hit(&observation(StatusCode::OK));

        assert!(first.render().contains("http_requests_total{"));
        assert!(!second.render().contains("http_requests_total{"));
    }

    #[test]
    fn test_hits_accumulate_per_label_set() {
        let metrics = MetricsContext::new().unwrap();
        metrics.record_hit(&observation(StatusCode::OK));
        metrics.record_hit(&observation(StatusCode::OK));
        metrics.record_hit(&observation(StatusCode::NOT_FOUND));

        let rendered = metrics.render();
        let ok_line = rendered
            .lines()
            .find(|l| l.starts_with("http_requests_total{") && l.contains(r#"status="OK""#))
            .expect("counter line for OK");
        assert!(ok_line.ends_with(" 2"), "unexpected line: {ok_line}");

        let not_found_line = rendered
            .lines()
            .find(|l| {
                l.starts_with("http_requests_total{") && l.contains(r#"status="Not Found""#)
            })
            .expect("counter line for Not Found");
        assert!(not_found_line.ends_with(" 1"));
    }

    #[test]
    fn test_latency_uses_default_buckets() {
        let metrics = MetricsContext::new().unwrap();
        metrics.record_latency(&observation(StatusCode::OK), Duration::from_millis(30));

        let rendered = metrics.render();
        assert!(rendered.contains("http_request_duration_seconds_bucket{"));
        assert!(rendered.contains(r#"le="0.005""#));
        assert!(rendered.contains(r#"le="+Inf""#));
        assert!(rendered.contains("http_request_duration_seconds_count{"));
    }

    #[tokio::test]
    async fn test_concurrent_recording() {
        let metrics = MetricsContext::new().unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let metrics = metrics.clone();
                tokio::spawn(async move {
                    for _ in 0..25 {
                        metrics.record_hit(&observation(StatusCode::OK));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let rendered = metrics.render();
        let line = rendered
            .lines()
            .find(|l| l.starts_with("http_requests_total{"))
            .unwrap();
        assert!(line.ends_with(" 400"), "unexpected line: {line}");
    }
}
