// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Mutex;

use crate::errors::RunnerError;
use crate::traits::{CommandOutcome, CommandRunner, CommandSpec};

/// Whether a command would have been detached or waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Detached,
    Run,
}

/// Records commands instead of running them. Every `run` reports exit 0.
#[derive(Default)]
pub struct DryRunRunner {
    issued: Mutex<Vec<(Invocation, CommandSpec)>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything issued so far, in order.
    pub fn issued(&self) -> Vec<(Invocation, CommandSpec)> {
        self.issued
            .lock()
            .map(|issued| issued.clone())
            .unwrap_or_default()
    }

    fn record(&self, invocation: Invocation, spec: &CommandSpec) {
        if let Ok(mut issued) = self.issued.lock() {
            issued.push((invocation, spec.clone()));
        }
    }
}

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), RunnerError> {
        self.record(Invocation::Detached, spec);
        Ok(())
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, RunnerError> {
        self.record(Invocation::Run, spec);
        Ok(CommandOutcome::Exited(0))
    }

    fn name(&self) -> &'static str {
        "dry_run"
    }
}
