//! External command execution with a deadline.

use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::time;

use crate::config::CommandConfig;

/// Captured output of a command that exited with status zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Why an invocation did not produce a successful [`CommandOutput`].
#[derive(Debug, Error)]
pub enum CommandError {
    /// The deadline passed; the child has been killed.
    #[error("`{program}` timed out after {}s", .after.as_secs())]
    Timeout { program: String, after: Duration },

    /// The process could not be started (not found, not executable, ...).
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("`{program}` exited with {}: {stderr}", describe_code(.code))]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Anything else while waiting on the child.
    #[error("error waiting on `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (killed by signal)".to_string(),
    }
}

/// Coarse failure classification used for log wording and metric labels.
///
/// The monitor's state machine treats every kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Invocation,
    ExitStatus,
    Unexpected,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Invocation => "invocation",
            FailureKind::ExitStatus => "exit_status",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

impl CommandError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CommandError::Timeout { .. } => FailureKind::Timeout,
            CommandError::Spawn { .. } => FailureKind::Invocation,
            CommandError::ExitStatus { .. } => FailureKind::ExitStatus,
            CommandError::Io { .. } => FailureKind::Unexpected,
        }
    }

    pub fn timeout(program: impl Into<String>, after: Duration) -> Self {
        CommandError::Timeout {
            program: program.into(),
            after,
        }
    }

    pub fn exit_status(program: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        CommandError::ExitStatus {
            program: program.into(),
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    pub fn not_found(program: impl Into<String>) -> Self {
        CommandError::Spawn {
            program: program.into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }
}

/// Runs one external command to completion or until its deadline.
pub trait CommandRunner {
    fn run(
        &self,
        command: &CommandConfig,
    ) -> impl Future<Output = Result<CommandOutput, CommandError>> + Send;
}

impl<R: CommandRunner> CommandRunner for Arc<R> {
    fn run(
        &self,
        command: &CommandConfig,
    ) -> impl Future<Output = Result<CommandOutput, CommandError>> + Send {
        (**self).run(command)
    }
}

/// Production runner that spawns the program directly (no shell).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandConfig) -> Result<CommandOutput, CommandError> {
        let program = command.program.clone();
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match time::timeout(command.timeout(), child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(CommandError::Io { program, source }),
            Err(_) => return Err(CommandError::timeout(program, command.timeout())),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            Err(CommandError::ExitStatus {
                program,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}
