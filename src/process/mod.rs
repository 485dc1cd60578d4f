//! External process subsystem.
//!
//! # Data Flow
//! ```text
//! CommandConfig (program, args, timeout)
//!     → CommandRunner::run
//!         → spawn child (stdin closed, stdout/stderr captured)
//!         → wait with deadline
//!     → Ok(CommandOutput)            exit status zero
//!     → Err(CommandError::Timeout)    deadline passed, child killed
//!     → Err(CommandError::Spawn)      program missing / not executable
//!     → Err(CommandError::ExitStatus) non-zero exit
//!     → Err(CommandError::Io)         anything else
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Arguments are passed directly, never through a shell
//! - Callers decide what output means; this layer only reports what happened

pub mod runner;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use runner::{CommandError, CommandOutput, CommandRunner, FailureKind, ProcessRunner};
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedRunner;
