//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber once at startup
//! - Mirror every line to stderr and to the configured log file
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - The file copy is plain text (no ANSI) so it can be grepped
//! - Console output goes to stderr; stdout is reserved for `--once` reports

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {}: {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Build the level filter: `RUST_LOG` if set and valid, else the configured level, else `info`.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ObservabilityConfig {
            log_file: Some(dir.path().join("missing-dir").join("monitor.log")),
            ..ObservabilityConfig::default()
        };
        let err = init(&config).unwrap_err();
        assert!(matches!(err, LoggingError::OpenFile { .. }));
        assert!(err.to_string().contains("monitor.log"));
    }
}
