// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::Instrument;

use crate::backends::interrupt::Interrupt;
use crate::engine::plan::{DeploymentPlan, StepKind};
use crate::errors::FailureStrategy;
use crate::observability::messages::sequencer::*;
use crate::observability::messages::StructuredLog;
use crate::traits::{CommandOutcome, CommandRunner};

/// Status reported for a step whose program could not be started.
pub const SPAWN_FAILED_CODE: i32 = 127;

/// How a single planned step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StepOutcome {
    Exited(i32),
    Signalled(i32),
    Interrupted,
    SpawnFailed(String),
    Skipped,
}

impl StepOutcome {
    pub fn success(&self) -> bool {
        matches!(self, StepOutcome::Exited(0))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped)
    }

    /// A step that ran, or tried to, and did not succeed.
    pub fn is_failure(&self) -> bool {
        !self.success() && !self.is_skipped()
    }

    /// Shell-style status code. Skipped steps have none.
    pub fn code(&self) -> Option<i32> {
        match self {
            StepOutcome::Exited(code) => Some(*code),
            StepOutcome::Signalled(signal) => Some(128 + signal),
            StepOutcome::Interrupted => Some(CommandOutcome::Interrupted.code()),
            StepOutcome::SpawnFailed(_) => Some(SPAWN_FAILED_CODE),
            StepOutcome::Skipped => None,
        }
    }
}

impl From<CommandOutcome> for StepOutcome {
    fn from(outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Exited(code) => StepOutcome::Exited(code),
            CommandOutcome::Signalled(signal) => StepOutcome::Signalled(signal),
            CommandOutcome::Interrupted => StepOutcome::Interrupted,
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Exited(code) => write!(f, "exited with status {}", code),
            StepOutcome::Signalled(signal) => write!(f, "killed by signal {}", signal),
            StepOutcome::Interrupted => write!(f, "interrupted"),
            StepOutcome::SpawnFailed(error) => write!(f, "could not be started: {}", error),
            StepOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub kind: StepKind,
    pub command_line: String,
    pub outcome: StepOutcome,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SequenceReport {
    pub steps: Vec<StepReport>,
}

impl SequenceReport {
    /// Status of the last step that actually ran; with the kill always
    /// running last, that is the remote kill's status.
    pub fn exit_code(&self) -> i32 {
        self.steps
            .iter()
            .rev()
            .find_map(|step| step.outcome.code())
            .unwrap_or(0)
    }

    pub fn failed(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.outcome.is_failure())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.outcome.is_skipped())
    }

    pub fn outcome_of(&self, kind: StepKind) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|step| step.kind == kind)
            .map(|step| &step.outcome)
    }
}

/// Runs a [`DeploymentPlan`] one step at a time.
///
/// Setup steps stop being issued after an interrupt, or after the first
/// failure under [`FailureStrategy::FailFast`]. Teardown steps are always
/// issued, each exactly once, after the agent step has finished.
pub struct Sequencer {
    failure_strategy: FailureStrategy,
    interrupt: Interrupt,
}

impl Sequencer {
    pub fn new(failure_strategy: FailureStrategy) -> Self {
        Self {
            failure_strategy,
            interrupt: Interrupt::never(),
        }
    }

    /// Halt setup once `interrupt` has fired, even if it landed between
    /// two steps.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub async fn run(&self, plan: &DeploymentPlan, runner: &dyn CommandRunner) -> SequenceReport {
        let start_msg = SequenceStarted {
            step_count: plan.len(),
            failure_strategy: self.failure_strategy.name(),
            runner: runner.name(),
        };
        let span = start_msg.span("deployment_sequence");
        start_msg.log();

        let started = Instant::now();
        let total = plan.len();
        let mut report = SequenceReport::default();
        let mut halted: Option<&'static str> = None;

        for (index, step) in plan.steps.iter().enumerate() {
            let command_line = step.command.display_line();
            let step_name = step.kind.name();

            if let (Some(reason), false) = (halted, step.kind.is_teardown()) {
                tracing::warn!(
                    "{}",
                    StepSkipped {
                        step: step_name,
                        reason,
                    }
                );
                report.steps.push(StepReport {
                    kind: step.kind,
                    command_line,
                    outcome: StepOutcome::Skipped,
                    duration_ms: 0,
                });
                continue;
            }

            let step_msg = StepStarted {
                index: index + 1,
                total,
                step: step_name,
                command_line: &command_line,
            };
            let step_span = step_msg.span("step");
            step_msg.log();

            let step_started = Instant::now();
            let run = runner.run(&step.command).instrument(step_span);
            let outcome = match run.instrument(span.clone()).await {
                Ok(outcome) => StepOutcome::from(outcome),
                Err(error) => {
                    tracing::error!(step = step_name, error = %error, "step could not be started");
                    StepOutcome::SpawnFailed(error.to_string())
                }
            };
            let duration = step_started.elapsed();

            if outcome.success() {
                StepCompleted {
                    step: step_name,
                    duration,
                }
                .log();
            } else {
                StepFailed {
                    step: step_name,
                    outcome: &outcome.to_string(),
                    duration,
                }
                .log();
            }

            if !step.kind.is_teardown() && halted.is_none() {
                if outcome == StepOutcome::Interrupted || self.interrupt.is_set() {
                    halted = Some("sequence was interrupted");
                } else if !outcome.success() && self.failure_strategy == FailureStrategy::FailFast {
                    halted = Some("an earlier step failed");
                }
            }

            report.steps.push(StepReport {
                kind: step.kind,
                command_line,
                outcome,
                duration_ms: duration.as_millis() as u64,
            });
        }

        SequenceCompleted {
            exit_code: report.exit_code(),
            failed_steps: report.failed().count(),
            skipped_steps: report.skipped().count(),
            duration: started.elapsed(),
        }
        .log();

        report
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(FailureStrategy::default())
    }
}
