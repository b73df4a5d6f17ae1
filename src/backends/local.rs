// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::backends::interrupt::Interrupt;
use crate::errors::RunnerError;
use crate::observability::messages::sequencer::InterruptReceived;
use crate::traits::{CommandOutcome, CommandRunner, CommandSpec, OutputMode};

/// How long an interrupted child gets to exit on its own before it is killed.
pub const DEFAULT_INTERRUPT_GRACE: Duration = Duration::from_secs(10);

/// Runs commands as local child processes via `tokio::process`.
///
/// A blocking run ends early when `interrupt` fires while the child is still
/// running. Without [`with_interrupt`](Self::with_interrupt) it never does.
pub struct LocalRunner {
    interrupt: Interrupt,
    interrupt_grace: Duration,
}

impl LocalRunner {
    pub fn new() -> Self {
        Self {
            interrupt: Interrupt::never(),
            interrupt_grace: DEFAULT_INTERRUPT_GRACE,
        }
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_interrupt_grace(mut self, interrupt_grace: Duration) -> Self {
        self.interrupt_grace = interrupt_grace;
        self
    }

    fn build(spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }
        command.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if spec.output == OutputMode::Discard {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
        command
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), RunnerError> {
        let child = Self::build(spec)
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: spec.program.clone(),
                source,
            })?;
        tracing::trace!(pid = ?child.id(), program = %spec.program, "detached child started");
        // Dropping the handle leaves the child running; tokio reaps it if it
        // exits while we are still alive.
        drop(child);
        Ok(())
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, RunnerError> {
        let mut child = Self::build(spec)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        let wait_error = |source: std::io::Error| RunnerError::Wait {
            program: spec.program.clone(),
            source,
        };

        let seen = self.interrupt.count();
        tokio::select! {
            status = child.wait() => status.map(outcome_from_status).map_err(wait_error),
            () = self.interrupt.after(seen) => {
                // A terminal Ctrl-C reaches the child's process group too.
                tracing::warn!(
                    "{}",
                    InterruptReceived {
                        program: &spec.program,
                        grace: self.interrupt_grace,
                    }
                );
                match tokio::time::timeout(self.interrupt_grace, child.wait()).await {
                    Ok(status) => {
                        status.map_err(wait_error)?;
                    }
                    Err(_) => {
                        tracing::warn!(program = %spec.program, "grace period elapsed, killing child");
                        child.kill().await.map_err(wait_error)?;
                    }
                }
                Ok(CommandOutcome::Interrupted)
            }
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(unix)]
fn outcome_from_status(status: ExitStatus) -> CommandOutcome {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => CommandOutcome::Exited(code),
        (None, Some(signal)) => CommandOutcome::Signalled(signal),
        (None, None) => CommandOutcome::Exited(1),
    }
}

#[cfg(not(unix))]
fn outcome_from_status(status: ExitStatus) -> CommandOutcome {
    CommandOutcome::Exited(status.code().unwrap_or(1))
}
