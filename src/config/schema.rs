//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default polling interval between cycles.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Default number of consecutive failed checks before recovery is attempted.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

const STATUS_TIMEOUT_SECS: u64 = 10;
const RECOVERY_TIMEOUT_SECS: u64 = 30;
const KEEP_ALIVE_SETTLE_SECS: u64 = 10;

/// Named presets reproducing the deployed monitor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Long-running keep-alive service: broad keyword set, settle delay after recovery.
    #[default]
    KeepAlive,
    /// Lightweight watcher: no "up" keyword, resumes polling right after recovery.
    Monitor,
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Health monitor settings.
    pub monitor: MonitorConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Build the configuration for a named preset.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::KeepAlive => Self::default(),
            Profile::Monitor => Self {
                monitor: MonitorConfig {
                    keywords: vec!["connected".into(), "running".into(), "active".into()],
                    recovery: RecoveryConfig {
                        settle_secs: 0,
                        ..RecoveryConfig::default()
                    },
                    ..MonitorConfig::default()
                },
                observability: ObservabilityConfig {
                    log_file: Some(PathBuf::from("/tmp/whatsapp_monitor.log")),
                    ..ObservabilityConfig::default()
                },
            },
        }
    }
}

/// Health monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Name of the monitored gateway, used in log fields and metric labels.
    pub name: String,

    /// Seconds between the end of one cycle and the start of the next.
    pub interval_secs: u64,

    /// Consecutive failed checks before a recovery attempt.
    pub failure_threshold: u32,

    /// Words whose presence in status output means the gateway is up.
    pub keywords: Vec<String>,

    /// Command that reports gateway status.
    pub status: CommandConfig,

    /// Command that re-establishes the connection.
    pub recovery: RecoveryConfig,

    /// Optional keep-warm command sent while healthy.
    pub heartbeat: Option<HeartbeatConfig>,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            name: "whatsapp-gateway".to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            keywords: vec![
                "connected".into(),
                "running".into(),
                "active".into(),
                "up".into(),
            ],
            status: CommandConfig::default(),
            recovery: RecoveryConfig::default(),
            heartbeat: None,
        }
    }
}

/// An external command invocation with a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Executable name or path.
    pub program: String,

    /// Arguments passed verbatim (no shell).
    pub args: Vec<String>,

    /// Seconds before the child is killed and the call reported as timed out.
    pub timeout_secs: u64,
}

impl CommandConfig {
    pub fn new(program: impl Into<String>, args: &[&str], timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Render as a single shell-like line for logs.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self::new("openclaw", &["gateway", "status"], STATUS_TIMEOUT_SECS)
    }
}

/// Recovery command plus the pause applied after it succeeds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoveryConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,

    /// Seconds to wait after a successful recovery before polling resumes.
    pub settle_secs: u64,
}

impl RecoveryConfig {
    pub fn command(&self) -> CommandConfig {
        CommandConfig {
            program: self.program.clone(),
            args: self.args.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            program: "whatsapp_login".to_string(),
            args: vec!["action=start".to_string()],
            timeout_secs: RECOVERY_TIMEOUT_SECS,
            settle_secs: KEEP_ALIVE_SETTLE_SECS,
        }
    }
}

/// Heartbeat command sent every `every_cycles` consecutive healthy cycles.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeartbeatConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_heartbeat_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_every_cycles")]
    pub every_cycles: u64,
}

impl HeartbeatConfig {
    pub fn command(&self) -> CommandConfig {
        CommandConfig {
            program: self.program.clone(),
            args: self.args.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

fn default_heartbeat_timeout() -> u64 {
    STATUS_TIMEOUT_SECS
}

fn default_every_cycles() -> u64 {
    2
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// File that receives a copy of every log line.
    pub log_file: Option<PathBuf>,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: Some(PathBuf::from("/tmp/whatsapp_keepalive.log")),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_alive_defaults() {
        let config = AppConfig::for_profile(Profile::KeepAlive);
        assert_eq!(config.monitor.interval_secs, 60);
        assert_eq!(config.monitor.failure_threshold, 3);
        assert_eq!(config.monitor.status.display_line(), "openclaw gateway status");
        assert_eq!(config.monitor.status.timeout_secs, 10);
        assert_eq!(config.monitor.recovery.command().display_line(), "whatsapp_login action=start");
        assert_eq!(config.monitor.recovery.timeout_secs, 30);
        assert_eq!(config.monitor.recovery.settle_secs, 10);
        assert!(config.monitor.keywords.iter().any(|k| k == "up"));
    }

    #[test]
    fn test_monitor_profile_differs() {
        let config = AppConfig::for_profile(Profile::Monitor);
        assert!(!config.monitor.keywords.iter().any(|k| k == "up"));
        assert_eq!(config.monitor.recovery.settle_secs, 0);
        assert_eq!(
            config.observability.log_file,
            Some(PathBuf::from("/tmp/whatsapp_monitor.log"))
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [monitor]
            interval_secs = 5

            [monitor.recovery]
            program = "gateway-restart"
            args = []

            [monitor.heartbeat]
            program = "openclaw"
            args = ["message", "action=send"]
            "#,
        )
        .unwrap();

        assert_eq!(config.monitor.interval_secs, 5);
        assert_eq!(config.monitor.failure_threshold, 3);
        assert_eq!(config.monitor.recovery.program, "gateway-restart");
        assert!(config.monitor.recovery.args.is_empty());
        assert_eq!(config.monitor.recovery.timeout_secs, 30);
        assert_eq!(config.monitor.recovery.settle_secs, 10);

        let heartbeat = config.monitor.heartbeat.unwrap();
        assert_eq!(heartbeat.command().display_line(), "openclaw message action=send");
        assert_eq!(heartbeat.timeout_secs, 10);
        assert_eq!(heartbeat.every_cycles, 2);
    }
}
