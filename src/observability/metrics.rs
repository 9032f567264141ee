//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (request counts, latency, denials, upstream errors)
//! - Expose a Prometheus-compatible scrape endpoint
//!
//! # Metrics
//! - `proxy_requests_total` (counter): completed requests by method, status class
//! - `proxy_request_duration_seconds` (histogram): latency by method
//! - `proxy_requests_denied_total` (counter): requests the gate answered locally
//! - `proxy_upstream_errors_total` (counter): round trips that failed in transit
//!
//! # Design Decisions
//! - Recording helpers are callable before `init_metrics`; the metrics
//!   crate drops events until a recorder is installed, so unit tests need
//!   no setup
//! - Labels carry the method and a coarse status class, not raw paths,
//!   to keep cardinality bounded

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and describe the proxy's metrics.
///
/// The exporter serves scrapes on `addr` from a background task. Failure
/// to bind is logged, not fatal: the proxy keeps serving without metrics.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        return;
    }

    describe_counter!("proxy_requests_total", "Completed requests by method and status class");
    describe_histogram!(
        "proxy_request_duration_seconds",
        "Request latency in seconds, by method"
    );
    describe_counter!(
        "proxy_requests_denied_total",
        "Requests denied by the authentication gate"
    );
    describe_counter!("proxy_upstream_errors_total", "Failed upstream round trips");

    tracing::info!(address = %addr, "Metrics exporter listening");
}

/// Record one completed request, whatever its outcome.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let status_class = match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    };

    counter!("proxy_requests_total", "method" => method.to_string(), "status" => status_class)
        .increment(1);
    histogram!("proxy_request_duration_seconds", "method" => method.to_string())
        .record(start_time.elapsed().as_secs_f64());
}

/// Record a request the gate answered with the local 401.
pub fn record_denied() {
    counter!("proxy_requests_denied_total").increment(1);
}

/// Record a round trip that failed before a response came back.
pub fn record_upstream_error() {
    counter!("proxy_upstream_errors_total").increment(1);
}
