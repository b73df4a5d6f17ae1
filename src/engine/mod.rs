// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod device_bank;
pub mod plan;
pub mod sequencer;
#[cfg(test)]
pub mod integration_tests;

pub use device_bank::{DeviceBankLauncher, LaunchReport};
pub use plan::{DeploymentPlan, PlannedStep, StepKind};
pub use sequencer::{SequenceReport, Sequencer, StepOutcome, StepReport};
