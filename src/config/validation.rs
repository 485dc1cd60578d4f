//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals, thresholds and timeouts > 0)
//! - Reject commands and keyword sets that can never succeed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{AppConfig, CommandConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `monitor.status.program`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for values that would make the monitor useless.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let monitor = &config.monitor;

    if monitor.interval_secs == 0 {
        errors.push(ValidationError::new("monitor.interval_secs", "must be at least 1"));
    }
    if monitor.failure_threshold == 0 {
        errors.push(ValidationError::new("monitor.failure_threshold", "must be at least 1"));
    }

    if monitor.keywords.is_empty() {
        errors.push(ValidationError::new("monitor.keywords", "must not be empty"));
    } else if monitor.keywords.iter().any(|k| k.trim().is_empty()) {
        errors.push(ValidationError::new("monitor.keywords", "must not contain blank entries"));
    }

    check_command("monitor.status", &monitor.status, &mut errors);
    check_command("monitor.recovery", &monitor.recovery.command(), &mut errors);

    if let Some(heartbeat) = &monitor.heartbeat {
        check_command("monitor.heartbeat", &heartbeat.command(), &mut errors);
        if heartbeat.every_cycles == 0 {
            errors.push(ValidationError::new("monitor.heartbeat.every_cycles", "must be at least 1"));
        }
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_command(prefix: &str, command: &CommandConfig, errors: &mut Vec<ValidationError>) {
    if command.program.trim().is_empty() {
        errors.push(ValidationError::new(format!("{prefix}.program"), "must not be empty"));
    }
    if command.timeout_secs == 0 {
        errors.push(ValidationError::new(format!("{prefix}.timeout_secs"), "must be at least 1"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{HeartbeatConfig, Profile};

    #[test]
    fn test_presets_are_valid() {
        assert!(validate_config(&AppConfig::for_profile(Profile::KeepAlive)).is_ok());
        assert!(validate_config(&AppConfig::for_profile(Profile::Monitor)).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.monitor.interval_secs = 0;
        config.monitor.failure_threshold = 0;
        config.monitor.status.program = " ".into();
        config.monitor.recovery.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "monitor.interval_secs",
                "monitor.failure_threshold",
                "monitor.status.program",
                "monitor.recovery.timeout_secs",
            ]
        );
    }

    #[test]
    fn test_rejects_blank_keyword() {
        let mut config = AppConfig::default();
        config.monitor.keywords.push(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "monitor.keywords");
    }

    #[test]
    fn test_heartbeat_cadence_must_be_positive() {
        let mut config = AppConfig::default();
        config.monitor.heartbeat = Some(HeartbeatConfig {
            program: "openclaw".into(),
            args: vec![],
            timeout_secs: 10,
            every_cycles: 0,
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "monitor.heartbeat.every_cycles");
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "not an address".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
