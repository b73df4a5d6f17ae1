// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Mutex;

use crate::backends::dry_run::Invocation;
use crate::errors::RunnerError;
use crate::traits::{CommandOutcome, CommandRunner, CommandSpec};

/// What a scripted command does when a rule matches it
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    /// The command runs and ends this way
    Outcome(CommandOutcome),
    /// The command cannot be started at all
    SpawnError,
}

/// A runner that never starts processes: it records every command and
/// answers from a list of `(needle, Scripted)` rules matched against the
/// command's display line. Unmatched commands exit 0.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Scripted)>,
    issued: Mutex<Vec<(Invocation, CommandSpec)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; the first matching rule wins.
    pub fn on(mut self, needle: &str, scripted: Scripted) -> Self {
        self.rules.push((needle.to_string(), scripted));
        self
    }

    pub fn issued(&self) -> Vec<(Invocation, CommandSpec)> {
        self.issued.lock().unwrap().clone()
    }

    pub fn issued_lines(&self) -> Vec<String> {
        self.issued()
            .iter()
            .map(|(_, spec)| spec.display_line())
            .collect()
    }

    fn answer(&self, invocation: Invocation, spec: &CommandSpec) -> Scripted {
        self.issued.lock().unwrap().push((invocation, spec.clone()));
        let line = spec.display_line();
        self.rules
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, scripted)| *scripted)
            .unwrap_or(Scripted::Outcome(CommandOutcome::Exited(0)))
    }

    fn spawn_error(spec: &CommandSpec) -> RunnerError {
        RunnerError::Spawn {
            program: spec.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted spawn failure"),
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), RunnerError> {
        match self.answer(Invocation::Detached, spec) {
            Scripted::SpawnError => Err(Self::spawn_error(spec)),
            Scripted::Outcome(_) => Ok(()),
        }
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, RunnerError> {
        match self.answer(Invocation::Run, spec) {
            Scripted::SpawnError => Err(Self::spawn_error(spec)),
            Scripted::Outcome(outcome) => Ok(outcome),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
