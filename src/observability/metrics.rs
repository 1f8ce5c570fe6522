//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_events_total` (counter): core events by kind
//! - `lb_requests_total` (counter): responses returned to callers, by status
//! - `lb_live_backends` (gauge): backends still in rotation
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::observability::events::EventKind;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_event(kind: EventKind) {
    metrics::counter!("lb_events_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_response(status: u16) {
    metrics::counter!("lb_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_live_backends(count: usize) {
    metrics::gauge!("lb_live_backends").set(count as f64);
}
