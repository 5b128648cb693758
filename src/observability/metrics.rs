//! Metrics collection and exposition.
//!
//! # Metrics
//! - `encoder_hash_requests_total` (counter): submissions by outcome
//! - `encoder_hash_duration_seconds` (histogram): submission handling time
//! - `encoder_lookups_total` (counter): digest lookups by outcome
//! - `encoder_shutdown_requests_total` (counter): shutdown triggers, first or repeat
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Record one submission attempt.
pub fn record_submission(outcome: &'static str, elapsed: Duration) {
    counter!("encoder_hash_requests_total", "outcome" => outcome).increment(1);
    histogram!("encoder_hash_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record one digest lookup.
pub fn record_lookup(outcome: &'static str) {
    counter!("encoder_lookups_total", "outcome" => outcome).increment(1);
}

/// Record a shutdown trigger.
pub fn record_shutdown_request(first: bool) {
    let kind = if first { "first" } else { "repeat" };
    counter!("encoder_shutdown_requests_total", "kind" => kind).increment(1);
}
