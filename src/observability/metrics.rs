//! Metrics collection and exposition.
//!
//! # Metrics
//! - `case_server_requests_total` (counter): requests by winning case, status
//! - `case_server_request_duration_seconds` (histogram): latency by case
//! - `case_server_script_runs_total` (counter): script runs by outcome
//!
//! Recording is a no-op until a recorder is installed, so the hot path does
//! not care whether export is enabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one answered request.
pub fn record_request(case: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "case_server_requests_total",
        "case" => case,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("case_server_request_duration_seconds", "case" => case)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one script run.
pub fn record_script_run(outcome: &'static str) {
    ::metrics::counter!("case_server_script_runs_total", "outcome" => outcome).increment(1);
}
