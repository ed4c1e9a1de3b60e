//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relayer_claims_total` (counter): claims by outcome and fee path
//! - `relayer_claim_duration_seconds` (histogram): end-to-end relay latency
//! - `relayer_http_requests_total` (counter): HTTP replies by route and status field

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of one claim relay.
pub fn record_claim(outcome: &'static str, fee_path: &'static str, start: Instant) {
    counter!("relayer_claims_total", "outcome" => outcome, "fee_path" => fee_path).increment(1);
    histogram!("relayer_claim_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record an HTTP reply.
pub fn record_request(route: &'static str, status: u16) {
    counter!("relayer_http_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
}
