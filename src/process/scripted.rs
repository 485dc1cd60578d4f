//! Scripted runner for exercising the monitor without spawning processes.
//!
//! Responses are queued per program name and handed out in order. A program
//! with an empty queue answers with empty stdout and exit status zero.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time;

use crate::config::CommandConfig;
use crate::process::runner::{CommandError, CommandOutput, CommandRunner};

type Response = Result<CommandOutput, CommandError>;

struct Step {
    delay: Duration,
    response: Response,
}

/// Test double that records invocations and returns queued responses.
#[derive(Default)]
pub struct ScriptedRunner {
    queues: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next invocation of `program`.
    pub fn respond(&self, program: &str, response: Response) -> &Self {
        self.respond_after(program, Duration::ZERO, response)
    }

    /// Queue a response that is returned only after `delay` has elapsed.
    pub fn respond_after(&self, program: &str, delay: Duration, response: Response) -> &Self {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(program.to_string())
            .or_default()
            .push_back(Step { delay, response });
        self
    }

    /// Queue `count` identical stdout responses.
    pub fn respond_stdout(&self, program: &str, stdout: &str, count: usize) -> &Self {
        for _ in 0..count {
            self.respond(program, Ok(CommandOutput::from_stdout(stdout)));
        }
        self
    }

    /// Every invocation so far, rendered as command lines.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of invocations of `program`.
    pub fn calls_to(&self, program: &str) -> usize {
        self.calls()
            .iter()
            .filter(|line| line.split(' ').next() == Some(program))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &CommandConfig) -> Result<CommandOutput, CommandError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.display_line());

        let step = self
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&command.program)
            .and_then(VecDeque::pop_front);

        match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    time::sleep(step.delay).await;
                }
                step.response
            }
            None => Ok(CommandOutput::default()),
        }
    }
}
