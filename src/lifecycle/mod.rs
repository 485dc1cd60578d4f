//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Init logging/metrics → Install signals → Run monitor
//!
//! Shutdown (shutdown.rs):
//!     Flag raised → loop notices at next sleep step or cycle boundary → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → raise shutdown flag
//!     Second SIGTERM/SIGINT → abandon in-flight cycle
//! ```
//!
//! # Design Decisions
//! - Single thread of control; the signal listener is a sibling future, not a task
//! - A cycle is never cut short by the first signal

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::{run_until_signalled, ShutdownSignals};
