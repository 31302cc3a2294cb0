//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prerender_requests_total` (counter), labelled by `outcome`:
//!   `pass_through`, `rendered`, `redirected`, `build`,
//!   `upstream_transport`, `body_read`
//!
//! # Design Decisions
//! - Without an installed recorder every update is a no-op
//! - The Prometheus exporter is opt-in from the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "prerender_requests_total";

pub fn record_outcome(outcome: &'static str) {
    ::metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
