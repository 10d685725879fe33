//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_fs_events_total` (counter): relevant file-system events seen
//! - `config_reloads_total` (counter): reload attempts by `outcome`
//!   (`ok`, `unavailable`, `malformed`)
//! - `config_generation` (gauge): generation of the published snapshot
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_fs_event() {
    ::metrics::counter!("config_fs_events_total").increment(1);
}

pub fn record_reload(outcome: &'static str) {
    ::metrics::counter!("config_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_generation(generation: u64) {
    ::metrics::gauge!("config_generation").set(generation as f64);
}
