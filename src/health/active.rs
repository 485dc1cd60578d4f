//! Active gateway health monitoring.
//!
//! # Responsibilities
//! - Periodically run the status command and classify its output
//! - Count consecutive failures and run the recovery command at the threshold
//! - Send an optional heartbeat while the gateway is healthy

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{Instrument, Span};

use crate::config::MonitorConfig;
use crate::health::classify::KeywordClassifier;
use crate::health::state::{HealthRecord, MonitorState, Status};
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::process::{CommandError, CommandRunner, FailureKind};

/// Result of a single status probe.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub gateway: String,
    pub status: Status,
    /// Set when the command itself failed rather than reporting "down".
    pub failure: Option<FailureKind>,
    /// Keyword that made the check positive.
    pub matched: Option<String>,
    pub checked_at_unix_ms: u64,
    /// Raw stdout, or the error text when the command failed.
    pub detail: String,
}

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub status: Status,
    pub consecutive_failures: u32,
    /// The check succeeded after one or more failures.
    pub restored: bool,
    /// `Some(success)` when a recovery attempt was made.
    pub recovery: Option<bool>,
    /// `Some(success)` when a heartbeat was sent.
    pub heartbeat: Option<bool>,
}

pub struct HealthMonitor<R> {
    runner: R,
    config: MonitorConfig,
    classifier: KeywordClassifier,
    record: HealthRecord,
    state: MonitorState,
    healthy_streak: u64,
    span: Span,
}

impl<R: CommandRunner> HealthMonitor<R> {
    pub fn new(runner: R, config: MonitorConfig) -> Self {
        let span = tracing::info_span!("monitor", gateway = %config.name);
        Self {
            runner,
            classifier: KeywordClassifier::new(&config.keywords),
            record: HealthRecord::new(config.failure_threshold),
            state: MonitorState::Disconnected,
            healthy_streak: 0,
            span,
            config,
        }
    }

    pub fn record(&self) -> &HealthRecord {
        &self.record
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run the status command once without touching the health record.
    pub async fn probe(&self) -> CheckReport {
        let command = &self.config.status;
        let checked_at_unix_ms = unix_ms(SystemTime::now());

        match self.runner.run(command).await {
            Ok(output) => {
                let matched = self.classifier.matched_keyword(&output.stdout).map(str::to_string);
                let status = if matched.is_some() {
                    Status::Connected
                } else {
                    Status::Disconnected
                };
                CheckReport {
                    gateway: self.config.name.clone(),
                    status,
                    failure: None,
                    matched,
                    checked_at_unix_ms,
                    detail: output.stdout,
                }
            }
            Err(err) => {
                log_command_error("Gateway status check", &err);
                metrics::record_check_failure(&self.config.name, err.kind());
                CheckReport {
                    gateway: self.config.name.clone(),
                    status: Status::Disconnected,
                    failure: Some(err.kind()),
                    matched: None,
                    checked_at_unix_ms,
                    detail: err.to_string(),
                }
            }
        }
    }

    /// Check gateway status. Command failures of any kind count as disconnected.
    pub async fn check_status(&self) -> Status {
        self.probe().await.status
    }

    /// Run the recovery command. On success, wait the settle delay before returning.
    pub async fn attempt_recovery(&mut self) -> bool {
        self.transition(MonitorState::Recovering);

        let command = self.config.recovery.command();
        tracing::info!(command = %command.display_line(), "Attempting gateway reconnection");

        let succeeded = match self.runner.run(&command).await {
            Ok(output) => {
                tracing::info!(stdout = %output.stdout.trim(), "Reconnection initiated successfully");
                let settle = self.config.recovery.settle();
                if !settle.is_zero() {
                    tracing::debug!(settle_secs = settle.as_secs(), "Waiting for connection to settle");
                    tokio::time::sleep(settle).await;
                }
                true
            }
            Err(err) => {
                log_command_error("Reconnection attempt", &err);
                false
            }
        };

        metrics::record_recovery(&self.config.name, succeeded);
        self.transition(if succeeded {
            MonitorState::Connected
        } else {
            MonitorState::Disconnected
        });
        succeeded
    }

    /// One polling cycle: check, update the record, recover or heartbeat as due.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let status = self.check_status().await;
        let now = SystemTime::now();
        metrics::record_check(&self.config.name, status);

        let mut outcome = CycleOutcome {
            status,
            consecutive_failures: 0,
            restored: false,
            recovery: None,
            heartbeat: None,
        };

        if status == Status::Connected {
            outcome.restored = self.record.record_success(now);
            if outcome.restored {
                tracing::info!("Connection restored");
            } else {
                tracing::debug!("Gateway is connected");
            }
            self.transition(MonitorState::Connected);
            self.healthy_streak += 1;
            outcome.heartbeat = self.heartbeat_if_due().await;
        } else {
            self.healthy_streak = 0;
            let failures = self.record.record_failure(now);
            tracing::warn!(consecutive_failures = failures, "Gateway disconnected");
            self.transition(MonitorState::Disconnected);

            if self.record.recovery_due() {
                tracing::info!(
                    threshold = self.record.threshold(),
                    "Failure threshold reached, initiating reconnection"
                );
                let succeeded = self.attempt_recovery().await;
                self.record.record_recovery(succeeded);
                if !succeeded {
                    tracing::error!(
                        next_attempt_after = self.record.threshold(),
                        "Automatic reconnection failed, will retry after further failures"
                    );
                }
                outcome.recovery = Some(succeeded);
            }
        }

        outcome.consecutive_failures = self.record.consecutive_failures();
        metrics::record_health(&self.config.name, &self.record);
        outcome
    }

    /// Poll until `shutdown` is raised, then return the final record.
    ///
    /// The flag is checked between cycles and between one-second sleep steps;
    /// a cycle already in progress always completes.
    pub async fn run(mut self, shutdown: ShutdownListener) -> HealthRecord {
        let span = self.span.clone();
        async move {
            tracing::info!(
                interval_secs = self.config.interval_secs,
                failure_threshold = self.config.failure_threshold,
                status_command = %self.config.status.display_line(),
                "Health monitor starting"
            );

            while !shutdown.is_triggered() {
                self.run_cycle().await;
                if !shutdown.sleep(self.config.interval()).await {
                    break;
                }
            }

            tracing::info!(
                consecutive_failures = self.record.consecutive_failures(),
                "Health monitor stopped"
            );
            self.record
        }
        .instrument(span)
        .await
    }

    async fn heartbeat_if_due(&self) -> Option<bool> {
        let heartbeat = self.config.heartbeat.as_ref()?;
        if self.healthy_streak % heartbeat.every_cycles.max(1) != 0 {
            return None;
        }

        let command = heartbeat.command();
        match self.runner.run(&command).await {
            Ok(_) => {
                tracing::debug!("Heartbeat check successful");
                Some(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Heartbeat check failed");
                Some(false)
            }
        }
    }

    fn transition(&mut self, to: MonitorState) {
        if self.state != to {
            tracing::debug!(from = ?self.state, to = ?to, "State transition");
            self.state = to;
        }
    }
}

fn log_command_error(what: &str, err: &CommandError) {
    match err {
        CommandError::Timeout { after, .. } => {
            tracing::error!(timeout_secs = after.as_secs(), "{} timed out", what);
        }
        CommandError::Spawn { program, source } => {
            tracing::error!(program = %program, error = %source, "{} could not be started", what);
        }
        CommandError::ExitStatus { code, stderr, .. } => {
            tracing::warn!(code = ?code, stderr = %stderr, "{} exited unsuccessfully", what);
        }
        CommandError::Io { source, .. } => {
            tracing::error!(error = %source, "Unexpected error during {}", what.to_lowercase());
        }
    }
}

fn unix_ms(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
