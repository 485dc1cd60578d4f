//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Health monitor produces:
//!     → logging.rs (timestamped lines on stderr + log file)
//!     → metrics.rs (check/recovery counters, health gauges)
//!
//! Consumers:
//!     → Operators tailing the log file
//!     → Diagnostics scripts grepping recent lines for "error"
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Every log line carries its level in text
//! - The monitor's span adds the gateway name to each event

pub mod logging;
pub mod metrics;
