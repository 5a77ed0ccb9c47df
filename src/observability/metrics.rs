//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_backend_requests_total` (counter): responses by method, status
//! - `http_backend_request_duration_seconds` (histogram): time to response head
//! - `http_backend_transport_errors_total` (counter): failures before the head, by method
//! - `http_backend_stream_errors_total` (counter): body failures, by kind
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder it is a no-op
//! - The Prometheus exporter is opt-in via `init_metrics`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::StreamError;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a request whose response head arrived.
pub fn record_response(method: &str, status: u16, started: Instant) {
    metrics::counter!(
        "http_backend_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("http_backend_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record a request that failed before its response head.
pub fn record_transport_error(method: &str) {
    metrics::counter!("http_backend_transport_errors_total", "method" => method.to_string()).increment(1);
}

/// Record a body that ended in a failure.
pub fn record_stream_error(err: &StreamError) {
    let kind = match err {
        StreamError::Timeout(_) => "timeout",
        StreamError::Engine(_) => "engine",
        StreamError::Closed => "closed",
        StreamError::Interrupted => "interrupted",
        StreamError::InvalidUtf8 => "invalid_utf8",
    };
    metrics::counter!("http_backend_stream_errors_total", "kind" => kind).increment(1);
}
