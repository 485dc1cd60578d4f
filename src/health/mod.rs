//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active monitoring (active.rs):
//!     Cycle start
//!     → status command via CommandRunner
//!     → classify.rs (keyword match on stdout)
//!     → state.rs (update Health Record)
//!     → recovery command if the failure run hits the threshold
//!     → heartbeat command if healthy and due
//!     → interruptible sleep until the next cycle
//!
//! State machine (state.rs):
//!     Connected ←→ Disconnected → Recovering → Connected | Disconnected
//! ```
//!
//! # Design Decisions
//! - One monitor instance owns its record; nothing is global
//! - Timeouts, spawn errors and non-zero exits all count as one failed check
//! - Recovery never runs more than once per `failure_threshold` failures

pub mod active;
pub mod classify;
pub mod state;

pub use active::{CheckReport, CycleOutcome, HealthMonitor};
pub use classify::KeywordClassifier;
pub use state::{HealthRecord, MonitorState, Status};
