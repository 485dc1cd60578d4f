//! Gateway keep-alive monitor.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────┐
//!   │                      GATEWAY KEEP-ALIVE                        │
//!   │                                                                │
//!   │  ┌──────────┐   ┌────────────────────┐   ┌──────────────────┐  │
//!   │  │  config  │──▶│   health monitor   │──▶│  process runner  │──┼──▶ openclaw gateway status
//!   │  │ profiles │   │  check → count →   │   │ deadline + kill  │──┼──▶ whatsapp_login action=start
//!   │  │  + toml  │   │  recover / sleep   │   └──────────────────┘  │
//!   │  └──────────┘   └─────────┬──────────┘                         │
//!   │                           │                                    │
//!   │  ┌────────────────────────┴───────────────────────────────┐   │
//!   │  │  lifecycle: signals → shutdown flag                    │   │
//!   │  │  observability: stderr + log file, metrics (opt-in)    │   │
//!   │  └────────────────────────────────────────────────────────┘   │
//!   └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gateway_keepalive::config::{load_config, AppConfig, Profile};
use gateway_keepalive::health::{HealthMonitor, Status};
use gateway_keepalive::lifecycle::{run_until_signalled, Shutdown, ShutdownSignals};
use gateway_keepalive::observability::{logging, metrics};
use gateway_keepalive::process::ProcessRunner;

#[derive(Parser)]
#[command(name = "gateway-keepalive")]
#[command(
    about = "Keeps a messaging gateway connected by polling its status and reconnecting after repeated failures",
    long_about = None
)]
struct Cli {
    /// Built-in preset to run when no config file is given
    #[arg(short, long, value_enum, default_value_t = Profile::KeepAlive)]
    profile: Profile,

    /// TOML configuration file (overrides the preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check once, print the result as JSON, exit 0 if connected
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::for_profile(cli.profile),
    };

    logging::init(&config.observability)?;

    tracing::info!("gateway-keepalive v{} starting", env!("CARGO_PKG_VERSION"));

    let monitor = HealthMonitor::new(ProcessRunner, config.monitor);

    if cli.once {
        let report = monitor.probe().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.status == Status::Connected {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    let mut signals = ShutdownSignals::install()?;

    match run_until_signalled(&mut signals, &shutdown, monitor.run(shutdown.subscribe())).await {
        Some(record) => {
            tracing::info!(
                last_status = %record.status(),
                consecutive_failures = record.consecutive_failures(),
                "Shutdown complete"
            );
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::from(130)),
    }
}
