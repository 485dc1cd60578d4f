//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_checks_total` (counter): status checks by result
//! - `gateway_check_failures_total` (counter): failed invocations by kind
//! - `gateway_recovery_attempts_total` (counter): recovery attempts by result
//! - `gateway_consecutive_failures` (gauge): current failure run length
//! - `gateway_connected` (gauge): 1=connected, 0=otherwise
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Every series carries a `gateway` label so several monitors can share a scrape target

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::state::{HealthRecord, Status};
use crate::process::FailureKind;

/// Install the Prometheus recorder with an HTTP scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_check(gateway: &str, status: Status) {
    metrics::counter!(
        "gateway_checks_total",
        "gateway" => gateway.to_string(),
        "result" => status.to_string()
    )
    .increment(1);
}

pub fn record_check_failure(gateway: &str, kind: FailureKind) {
    metrics::counter!(
        "gateway_check_failures_total",
        "gateway" => gateway.to_string(),
        "kind" => kind.as_str()
    )
    .increment(1);
}

pub fn record_recovery(gateway: &str, succeeded: bool) {
    let result = if succeeded { "success" } else { "failure" };
    metrics::counter!(
        "gateway_recovery_attempts_total",
        "gateway" => gateway.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_health(gateway: &str, record: &HealthRecord) {
    metrics::gauge!("gateway_consecutive_failures", "gateway" => gateway.to_string())
        .set(record.consecutive_failures() as f64);
    let connected = if record.status() == Status::Connected { 1.0 } else { 0.0 };
    metrics::gauge!("gateway_connected", "gateway" => gateway.to_string()).set(connected);
}
