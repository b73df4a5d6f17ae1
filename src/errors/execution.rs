// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors and policies for running external commands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the deployment sequencer reacts when a setup step fails.
///
/// Teardown steps (stopping and killing the remote device bank) run under
/// every strategy.
///
/// # Variants
/// * `ContinueOnError` - Run every step in order regardless of earlier outcomes (default)
/// * `FailFast` - Skip the remaining setup steps after the first failure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    #[default]
    ContinueOnError,
    FailFast,
}

impl FailureStrategy {
    /// The config spelling, as used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            FailureStrategy::ContinueOnError => "continue_on_error",
            FailureStrategy::FailFast => "fail_fast",
        }
    }
}

/// Errors raised by a [`CommandRunner`](crate::traits::CommandRunner).
///
/// A command that starts and then exits non-zero is not an error; it is
/// reported through [`CommandOutcome`](crate::traits::CommandOutcome).
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The program could not be started (missing binary, bad cwd, ...).
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program started but waiting on it failed.
    #[error("Failed waiting on '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
