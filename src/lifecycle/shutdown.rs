//! Shutdown coordination for the monitor.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

/// Granularity of interruptible sleeps.
pub const SLEEP_STEP: Duration = Duration::from_secs(1);

/// Coordinator for graceful shutdown.
///
/// Holds a watch channel whose value flips to `true` once; listeners read it
/// as a flag at cycle boundaries and between sleep steps.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the shutdown flag.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Raise the shutdown flag. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of [`Shutdown`].
#[derive(Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Sleep for `duration` in one-second steps, checking the flag before each step.
    ///
    /// Returns `false` if shutdown was observed, `true` if the full duration elapsed.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.is_triggered() {
                return false;
            }
            let step = remaining.min(SLEEP_STEP);
            time::sleep(step).await;
            remaining -= step;
        }
        !self.is_triggered()
    }
}
