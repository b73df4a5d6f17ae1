// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the deployment sequence lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Sequence start and completion
//! * Individual step start, completion, failure and skipping
//! * Operator interrupts while a step is running

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Deployment sequence started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SequenceStarted<'a> {
    pub step_count: usize,
    pub failure_strategy: &'a str,
    /// Name of the command runner executing the steps
    pub runner: &'a str,
}

impl Display for SequenceStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting deployment sequence: {} steps, failure_strategy={}, runner={}",
            self.step_count, self.failure_strategy, self.runner
        )
    }
}

impl StructuredLog for SequenceStarted<'_> {
    fn log(&self) {
        tracing::info!(
            step_count = self.step_count,
            failure_strategy = self.failure_strategy,
            runner = self.runner,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "deployment",
            span_name = name,
            step_count = self.step_count,
            failure_strategy = self.failure_strategy,
            runner = self.runner,
        )
    }
}

/// A step is about to run.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use scale_rig::observability::messages::sequencer::StepStarted;
///
/// let msg = StepStarted {
///     index: 5,
///     total: 6,
///     step: "run_agent",
///     command_line: "python -m master_driver.agent",
/// };
///
/// assert_eq!(msg.to_string(), "[5/6] run_agent: python -m master_driver.agent");
/// ```
pub struct StepStarted<'a> {
    pub index: usize,
    pub total: usize,
    pub step: &'a str,
    pub command_line: &'a str,
}

impl Display for StepStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] {}: {}",
            self.index, self.total, self.step, self.command_line
        )
    }
}

impl StructuredLog for StepStarted<'_> {
    fn log(&self) {
        tracing::info!(
            index = self.index,
            total = self.total,
            step = self.step,
            command = self.command_line,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "step",
            span_name = name,
            index = self.index,
            step = self.step,
        )
    }
}

/// A step ran and exited zero.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StepCompleted<'a> {
    pub step: &'a str,
    pub duration: std::time::Duration,
}

impl Display for StepCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Step '{}' completed in {:?}", self.step, self.duration)
    }
}

impl StructuredLog for StepCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            step = self.step,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("step_completed", span_name = name, step = self.step)
    }
}

/// A step exited non-zero, died, was interrupted, or never started.
///
/// # Log Level
/// `warn!` - The sequence carries on (or moves to teardown)
pub struct StepFailed<'a> {
    pub step: &'a str,
    pub outcome: &'a str,
    pub duration: std::time::Duration,
}

impl Display for StepFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Step '{}' failed after {:?}: {}",
            self.step, self.duration, self.outcome
        )
    }
}

impl StructuredLog for StepFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            step = self.step,
            outcome = self.outcome,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("step_failed", span_name = name, step = self.step)
    }
}

/// A setup step was skipped.
///
/// # Log Level
/// `warn!`
pub struct StepSkipped<'a> {
    pub step: &'a str,
    pub reason: &'a str,
}

impl Display for StepSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping step '{}': {}", self.step, self.reason)
    }
}

/// Ctrl-C arrived while a command was running.
///
/// # Log Level
/// `warn!`
pub struct InterruptReceived<'a> {
    pub program: &'a str,
    pub grace: std::time::Duration,
}

impl Display for InterruptReceived<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Interrupt received; waiting up to {:?} for '{}' to exit",
            self.grace, self.program
        )
    }
}

/// The whole sequence has finished, teardown included.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SequenceCompleted {
    pub exit_code: i32,
    pub failed_steps: usize,
    pub skipped_steps: usize,
    pub duration: std::time::Duration,
}

impl Display for SequenceCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Deployment sequence finished in {:?}: exit_code={}, {} failed, {} skipped",
            self.duration, self.exit_code, self.failed_steps, self.skipped_steps
        )
    }
}

impl StructuredLog for SequenceCompleted {
    fn log(&self) {
        tracing::info!(
            exit_code = self.exit_code,
            failed_steps = self.failed_steps,
            skipped_steps = self.skipped_steps,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "deployment_completed",
            span_name = name,
            exit_code = self.exit_code,
        )
    }
}
