//! Gateway health state machine.
//!
//! # States
//! - Connected: last check (or recovery) succeeded
//! - Disconnected: last check failed
//! - Recovering: recovery command in flight (transient)
//!
//! # State Transitions
//! ```text
//! Connected    → Disconnected: failed check
//! Disconnected → Connected:    successful check
//! Disconnected → Recovering:   consecutive failures reach a multiple of the threshold
//! Recovering   → Connected:    recovery command exited zero (counter reset)
//! Recovering   → Disconnected: recovery failed (counter kept)
//! ```
//!
//! # Design Decisions
//! - One record per monitor, owned by the loop; no sharing, no atomics
//! - The counter keeps growing across failed recoveries so the next attempt
//!   waits for another full run of `threshold` failures

use std::fmt;
use std::time::SystemTime;

use serde::Serialize;

/// Result of the most recent check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Connected,
    Disconnected,
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Connected => "connected",
            Status::Disconnected => "disconnected",
            Status::Unknown => "unknown",
        })
    }
}

/// Phase of the monitor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Connected,
    Disconnected,
    Recovering,
}

/// In-memory health of the gateway between polling cycles.
#[derive(Debug, Clone)]
pub struct HealthRecord {
    status: Status,
    consecutive_failures: u32,
    last_checked: Option<SystemTime>,
    threshold: u32,
}

impl HealthRecord {
    /// Fresh record: status unknown, no failures. A zero threshold is treated as 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            status: Status::Unknown,
            consecutive_failures: 0,
            last_checked: None,
            threshold: threshold.max(1),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_checked(&self) -> Option<SystemTime> {
        self.last_checked
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record a positive check. Returns true when this ends a disconnection.
    pub fn record_success(&mut self, at: SystemTime) -> bool {
        let restored = self.status == Status::Disconnected;
        self.status = Status::Connected;
        self.consecutive_failures = 0;
        self.last_checked = Some(at);
        restored
    }

    /// Record a failed check. Returns the new consecutive failure count.
    pub fn record_failure(&mut self, at: SystemTime) -> u32 {
        self.status = Status::Disconnected;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_checked = Some(at);
        self.consecutive_failures
    }

    /// True when the current failure run has just reached a multiple of the threshold.
    pub fn recovery_due(&self) -> bool {
        self.consecutive_failures > 0 && self.consecutive_failures % self.threshold == 0
    }

    /// Apply the outcome of a recovery attempt.
    pub fn record_recovery(&mut self, succeeded: bool) {
        if succeeded {
            self.status = Status::Connected;
            self.consecutive_failures = 0;
        }
    }
}
