//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): finished chains by outcome and failed stage
//! - `relay_request_duration_seconds` (histogram): chain latency by outcome
//!
//! Recording is a no-op until a recorder is installed, so tests and runs with
//! metrics disabled pay nothing.

use std::net::SocketAddr;
use std::time::Duration;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished relay chain.
pub fn record_chain(outcome: &'static str, stage: &'static str, elapsed: Duration) {
    counter!("relay_requests_total", "outcome" => outcome, "stage" => stage).increment(1);
    histogram!("relay_request_duration_seconds", "outcome" => outcome).record(elapsed.as_secs_f64());
}
