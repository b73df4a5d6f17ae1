// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;

use crate::backends::RemoteSession;
use crate::config::{LocalCommand, RigConfig};
use crate::traits::CommandSpec;

/// The steps of a deployment, in the order they are always planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    BuildConfigs,
    InstallConfigs,
    DeployConfigs,
    StartDevices,
    RunAgent,
    StopDevices,
    KillRemote,
}

impl StepKind {
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::BuildConfigs => "build_configs",
            StepKind::InstallConfigs => "install_configs",
            StepKind::DeployConfigs => "deploy_configs",
            StepKind::StartDevices => "start_devices",
            StepKind::RunAgent => "run_agent",
            StepKind::StopDevices => "stop_devices",
            StepKind::KillRemote => "kill_remote",
        }
    }

    /// Teardown steps run no matter what happened before them.
    pub fn is_teardown(&self) -> bool {
        matches!(self, StepKind::StopDevices | StepKind::KillRemote)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub kind: StepKind,
    pub command: CommandSpec,
}

impl LocalCommand {
    pub fn to_spec(&self) -> CommandSpec {
        let spec = CommandSpec::new(&self.program).args(&self.args);
        match &self.cwd {
            Some(dir) => spec.current_dir(dir),
            None => spec,
        }
    }
}

/// An ordered, fully resolved list of commands for one deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    pub steps: Vec<PlannedStep>,
}

impl DeploymentPlan {
    pub fn from_config(config: &RigConfig) -> Self {
        let session = RemoteSession::from_config(&config.remote);
        let deployment = &config.deployment;

        let mut steps = vec![
            PlannedStep {
                kind: StepKind::BuildConfigs,
                command: deployment.build_configs.to_spec(),
            },
            PlannedStep {
                kind: StepKind::InstallConfigs,
                command: deployment.install_configs.to_spec(),
            },
            PlannedStep {
                kind: StepKind::DeployConfigs,
                command: deployment.deploy_configs.to_spec(),
            },
            PlannedStep {
                kind: StepKind::StartDevices,
                command: session.command(&deployment.start_devices),
            },
            PlannedStep {
                kind: StepKind::RunAgent,
                command: deployment.agent.to_spec(),
            },
        ];

        if let Some(stop) = &deployment.stop_devices {
            steps.push(PlannedStep {
                kind: StepKind::StopDevices,
                command: session.command(stop),
            });
        }

        steps.push(PlannedStep {
            kind: StepKind::KillRemote,
            command: session.kill_command(&config.kill_pattern(), deployment.kill_match),
        });

        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(|step| step.kind).collect()
    }
}
