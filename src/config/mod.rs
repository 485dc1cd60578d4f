//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --profile (keep-alive | monitor)        --config <file.toml>
//!     → schema.rs presets                     → loader.rs (parse & deserialize)
//!                                             → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → MonitorConfig moved into the health monitor
//!     → ObservabilityConfig consumed once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::CommandConfig;
pub use schema::HeartbeatConfig;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
pub use schema::Profile;
pub use schema::RecoveryConfig;
