//! Metrics collection and exposition.
//!
//! # Metrics
//! - `explorer_api_calls_total` (counter): hosted API calls by operation, coin, outcome
//! - `explorer_api_call_duration_seconds` (histogram): hosted API latency
//! - `explorer_page_views_total` (counter): handled requests by route, status
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter is optional and serves its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::blockcypher::{BlockCypherError, CoinSymbol};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome and latency of a hosted API call.
pub fn record_api_call<T>(
    operation: &'static str,
    coin: CoinSymbol,
    result: &Result<T, BlockCypherError>,
    start: Instant,
) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(BlockCypherError::NotFound(_)) => "not_found",
        Err(BlockCypherError::InvalidHash(_)) => "invalid",
        Err(BlockCypherError::Http(e)) if e.is_timeout() => "timeout",
        Err(_) => "error",
    };

    metrics::counter!(
        "explorer_api_calls_total",
        "operation" => operation,
        "coin" => coin.as_str(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "explorer_api_call_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a handled request against its route template.
pub fn record_page_view(route: &str, status: u16) {
    metrics::counter!(
        "explorer_page_views_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
