//! Monitor loop behavior over many cycles, driven by paused time.

use std::sync::Arc;
use std::time::Duration;

use gateway_keepalive::config::MonitorConfig;
use gateway_keepalive::health::{HealthMonitor, Status};
use gateway_keepalive::lifecycle::Shutdown;
use gateway_keepalive::process::{CommandError, ScriptedRunner};
use tokio::time::{self, Instant};

mod common;

/// Run the monitor until `stop_after` of (paused) time has passed.
async fn run_for(
    runner: Arc<ScriptedRunner>,
    config: MonitorConfig,
    stop_after: Duration,
) -> gateway_keepalive::health::HealthRecord {
    let shutdown = Shutdown::new();
    let monitor = HealthMonitor::new(runner, config);

    let (record, ()) = tokio::join!(monitor.run(shutdown.subscribe()), async {
        time::sleep(stop_after).await;
        shutdown.trigger();
    });
    record
}

#[tokio::test(start_paused = true)]
async fn test_one_cycle_per_interval() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.respond_stdout("openclaw", "Gateway: running", 10);

    // Cycles at 0s, 60s, 120s; stop while sleeping toward 180s.
    let record = run_for(runner.clone(), common::fast_config(), Duration::from_millis(150_500)).await;

    assert_eq!(runner.calls_to("openclaw"), 3);
    assert_eq!(record.status(), Status::Connected);
    assert_eq!(record.consecutive_failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_exits_within_a_second_of_shutdown() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.respond_stdout("openclaw", "Gateway: running", 1);

    let start = Instant::now();
    run_for(runner, common::fast_config(), Duration::from_millis(10_500)).await;
    assert_eq!(start.elapsed(), Duration::from_secs(11));
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_cycle_is_not_aborted() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.respond_after(
        "openclaw",
        Duration::from_secs(5),
        Ok(gateway_keepalive::process::CommandOutput::from_stdout("Gateway: disconnected")),
    );

    let start = Instant::now();
    let record = run_for(runner.clone(), common::fast_config(), Duration::from_secs(1)).await;

    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(record.status(), Status::Disconnected);
    assert_eq!(record.consecutive_failures(), 1);
    assert_eq!(runner.calls_to("openclaw"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recovery_once_per_threshold_run() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.respond_stdout("openclaw", "Gateway: disconnected", 6);

    // Six failing cycles at 0..=300s.
    let record = run_for(runner.clone(), common::fast_config(), Duration::from_secs(330)).await;

    assert_eq!(runner.calls_to("whatsapp_login"), 2);
    assert_eq!(record.consecutive_failures(), 0);
    assert_eq!(record.status(), Status::Connected);
}

#[tokio::test(start_paused = true)]
async fn test_failures_interleaved_with_successes_never_recover() {
    let runner = Arc::new(ScriptedRunner::new());
    for _ in 0..4 {
        runner
            .respond_stdout("openclaw", "offline", 2)
            .respond_stdout("openclaw", "connected", 1);
    }

    let record = run_for(runner.clone(), common::fast_config(), Duration::from_secs(690)).await;

    assert_eq!(runner.calls_to("openclaw"), 12);
    assert_eq!(runner.calls_to("whatsapp_login"), 0);
    assert_eq!(record.consecutive_failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_pushes_next_cycle() {
    let runner = Arc::new(ScriptedRunner::new());
    runner.respond_stdout("openclaw", "offline", 4);

    let mut config = common::fast_config();
    config.failure_threshold = 1;
    config.recovery.settle_secs = 10;

    // Cycle at 0s recovers and settles until 10s; next cycle at 70s; stop at 100s.
    run_for(runner.clone(), config, Duration::from_secs(100)).await;
    assert_eq!(runner.calls_to("openclaw"), 2);
    assert_eq!(runner.calls_to("whatsapp_login"), 2);
}

#[tokio::test]
async fn test_timeout_logged_as_timeout() {
    let (logs, _guard) = common::capture_logs();
    let runner = ScriptedRunner::new();
    runner.respond(
        "openclaw",
        Err(CommandError::timeout("openclaw", Duration::from_secs(10))),
    );

    let monitor = HealthMonitor::new(runner, common::fast_config());
    assert_eq!(monitor.check_status().await, Status::Disconnected);

    let text = logs.contents();
    assert!(text.contains("Gateway status check timed out"), "{text}");
    assert!(!text.contains("Unexpected error"), "{text}");
}

#[tokio::test]
async fn test_spawn_failure_logged_differently_from_timeout() {
    let (logs, _guard) = common::capture_logs();
    let runner = ScriptedRunner::new();
    runner.respond("openclaw", Err(CommandError::not_found("openclaw")));

    let monitor = HealthMonitor::new(runner, common::fast_config());
    assert_eq!(monitor.check_status().await, Status::Disconnected);

    let text = logs.contents();
    assert!(text.contains("Gateway status check could not be started"), "{text}");
    assert!(!text.contains("timed out"), "{text}");
}

#[tokio::test]
async fn test_restored_connection_is_logged() {
    let (logs, _guard) = common::capture_logs();
    let runner = ScriptedRunner::new();
    runner
        .respond_stdout("openclaw", "offline", 1)
        .respond_stdout("openclaw", "active", 1);

    let mut monitor = HealthMonitor::new(runner, common::fast_config());
    monitor.run_cycle().await;
    monitor.run_cycle().await;

    let text = logs.contents();
    assert!(text.contains("Gateway disconnected"), "{text}");
    assert!(text.contains("Connection restored"), "{text}");
}
