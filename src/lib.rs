//! Gateway keep-alive monitor library.
//!
//! Polls a messaging gateway's status command, counts consecutive failures,
//! and runs a recovery command once the failure run reaches a threshold.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod process;

pub use config::AppConfig;
pub use health::HealthMonitor;
pub use lifecycle::Shutdown;
