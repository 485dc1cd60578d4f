//! Shared utilities for integration testing.

use std::io;
use std::sync::{Arc, Mutex};

use gateway_keepalive::config::{CommandConfig, MonitorConfig};
use tracing::subscriber::DefaultGuard;

/// In-memory log sink.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's log events into a buffer until the guard is dropped.
#[allow(dead_code)]
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

/// Monitor config with the production command names, no settle delay and a one-minute interval.
#[allow(dead_code)]
pub fn fast_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.recovery.settle_secs = 0;
    config
}

/// `sh -c <script>` with the given deadline.
#[allow(dead_code)]
pub fn sh(script: &str, timeout_secs: u64) -> CommandConfig {
    CommandConfig::new("sh", &["-c", script], timeout_secs)
}

/// Send SIGINT to this test process.
#[cfg(unix)]
#[allow(dead_code)]
pub async fn send_interrupt() {
    let status = tokio::process::Command::new("kill")
        .arg("-INT")
        .arg(std::process::id().to_string())
        .status()
        .await
        .unwrap();
    assert!(status.success());
}
