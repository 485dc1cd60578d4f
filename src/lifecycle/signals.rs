//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT and SIGTERM handlers once at startup
//! - First signal raises the shutdown flag; the current cycle finishes
//! - Second signal abandons the in-flight cycle
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Signal streams are created before the loop starts so a signal that
//!   arrives mid-cycle is buffered, not lost

use std::future::Future;

use crate::lifecycle::shutdown::Shutdown;

/// Registered shutdown signal streams.
pub struct ShutdownSignals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next shutdown signal and return its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        "ctrl-c"
    }
}

/// Drive `task` to completion, raising `shutdown` on the first signal.
///
/// Returns `None` if a second signal arrived before `task` finished.
pub async fn run_until_signalled<F: Future>(
    signals: &mut ShutdownSignals,
    shutdown: &Shutdown,
    task: F,
) -> Option<F::Output> {
    tokio::pin!(task);

    tokio::select! {
        output = &mut task => return Some(output),
        signal = signals.recv() => {
            tracing::info!(signal, "Received shutdown signal, stopping after the current cycle");
            shutdown.trigger();
        }
    }

    tokio::select! {
        output = &mut task => Some(output),
        signal = signals.recv() => {
            tracing::warn!(signal, "Received second shutdown signal, abandoning the current cycle");
            None
        }
    }
}
