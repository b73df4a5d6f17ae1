// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::stub::{Scripted, ScriptedRunner};
use crate::backends::{DryRunRunner, Interrupt, InterruptHandle, Invocation};
use crate::config::RigConfig;
use crate::engine::{DeploymentPlan, DeviceBankLauncher, Sequencer, StepKind, StepOutcome};
use crate::errors::{FailureStrategy, RunnerError};
use crate::traits::{CommandOutcome, CommandRunner, CommandSpec};

/// End-to-end sequencer runs against scripted command outcomes
#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "master_driver.agent";
    const KILL: &str = "pkill python";

    /// Raises an interrupt while a matching command runs, then lets the
    /// command finish cleanly, as a Ctrl-C just after a step exits would.
    struct InterruptingRunner {
        inner: ScriptedRunner,
        needle: &'static str,
        handle: InterruptHandle,
    }

    #[async_trait]
    impl CommandRunner for InterruptingRunner {
        async fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), RunnerError> {
            self.inner.spawn_detached(spec).await
        }

        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome, RunnerError> {
            if spec.display_line().contains(self.needle) {
                self.handle.trigger();
            }
            self.inner.run(spec).await
        }

        fn name(&self) -> &'static str {
            "interrupting"
        }
    }

    fn plan() -> DeploymentPlan {
        DeploymentPlan::from_config(&RigConfig::default())
    }

    fn exited(code: i32) -> Scripted {
        Scripted::Outcome(CommandOutcome::Exited(code))
    }

    fn position(lines: &[String], needle: &str) -> usize {
        lines
            .iter()
            .position(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no command containing '{}'", needle))
    }

    #[tokio::test]
    async fn clean_run_issues_every_step_once_in_order() {
        let runner = ScriptedRunner::new();
        let report = Sequencer::default().run(&plan(), &runner).await;

        let lines = runner.issued_lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("fab build_configs"));
        assert!(lines[1].contains("install_master_driver_configs.py"));
        assert!(lines[2].contains("fab deploy_device_configs"));
        assert!(lines[3].contains("launch_bacnet.sh"));
        assert!(lines[4].contains(AGENT));
        assert!(lines[5].contains(KILL));
        assert!(runner
            .issued()
            .iter()
            .all(|(invocation, _)| *invocation == Invocation::Run));

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.failed().count(), 0);
    }

    #[tokio::test]
    async fn failures_fall_through_by_default() {
        let runner = ScriptedRunner::new()
            .on("fab build_configs", exited(1))
            .on("install_master_driver_configs.py", Scripted::SpawnError)
            .on("launch_bacnet.sh", exited(255))
            .on(AGENT, Scripted::Outcome(CommandOutcome::Signalled(11)));

        let report = Sequencer::new(FailureStrategy::ContinueOnError)
            .run(&plan(), &runner)
            .await;

        assert_eq!(runner.issued().len(), 6);
        assert_eq!(report.failed().count(), 4);
        assert_eq!(report.skipped().count(), 0);
        assert!(matches!(
            report.outcome_of(StepKind::InstallConfigs),
            Some(StepOutcome::SpawnFailed(_))
        ));
        assert_eq!(
            report.outcome_of(StepKind::RunAgent),
            Some(&StepOutcome::Signalled(11))
        );
        // Only the final command decides the sequence status.
        assert_eq!(report.exit_code(), 0);
    }

    #[tokio::test]
    async fn kill_runs_exactly_once_after_the_agent() {
        for agent in [
            exited(0),
            exited(3),
            Scripted::SpawnError,
            Scripted::Outcome(CommandOutcome::Interrupted),
        ] {
            let runner = ScriptedRunner::new().on(AGENT, agent);
            Sequencer::default().run(&plan(), &runner).await;

            let lines = runner.issued_lines();
            let kills = lines.iter().filter(|line| line.contains(KILL)).count();
            assert_eq!(kills, 1);
            assert!(position(&lines, AGENT) < position(&lines, KILL));
        }
    }

    #[tokio::test]
    async fn exit_code_is_the_kill_status() {
        let runner = ScriptedRunner::new().on(KILL, exited(1));
        let report = Sequencer::default().run(&plan(), &runner).await;
        assert_eq!(report.exit_code(), 1);

        let runner = ScriptedRunner::new().on(KILL, Scripted::SpawnError);
        let report = Sequencer::default().run(&plan(), &runner).await;
        assert_eq!(report.exit_code(), 127);

        let runner = ScriptedRunner::new()
            .on(AGENT, exited(9))
            .on(KILL, Scripted::Outcome(CommandOutcome::Signalled(15)));
        let report = Sequencer::default().run(&plan(), &runner).await;
        assert_eq!(report.exit_code(), 143);
    }

    #[tokio::test]
    async fn fail_fast_skips_setup_but_still_tears_down() {
        let runner = ScriptedRunner::new().on("fab deploy_device_configs", exited(2));
        let report = Sequencer::new(FailureStrategy::FailFast)
            .run(&plan(), &runner)
            .await;

        let lines = runner.issued_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].contains(KILL));
        assert_eq!(report.outcome_of(StepKind::StartDevices), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome_of(StepKind::RunAgent), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome_of(StepKind::KillRemote), Some(&StepOutcome::Exited(0)));
        assert_eq!(report.skipped().count(), 2);
        assert_eq!(report.steps.len(), 6);
    }

    #[tokio::test]
    async fn interrupt_during_setup_skips_the_rest_of_setup() {
        let mut config = RigConfig::default();
        config.deployment.stop_devices = Some("python shutdown.py".to_string());
        let plan = DeploymentPlan::from_config(&config);

        let runner = ScriptedRunner::new().on(
            "install_master_driver_configs.py",
            Scripted::Outcome(CommandOutcome::Interrupted),
        );
        let report = Sequencer::new(FailureStrategy::ContinueOnError)
            .run(&plan, &runner)
            .await;

        let lines = runner.issued_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("shutdown.py"));
        assert!(lines[3].contains(KILL));
        assert_eq!(report.skipped().count(), 3);
    }

    #[tokio::test]
    async fn interrupt_between_steps_is_not_lost() {
        let (handle, interrupt) = Interrupt::manual();
        let runner = InterruptingRunner {
            inner: ScriptedRunner::new(),
            needle: "fab deploy_device_configs",
            handle,
        };

        let report = Sequencer::default()
            .with_interrupt(interrupt)
            .run(&plan(), &runner)
            .await;

        let lines = runner.inner.issued_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].contains(KILL));
        assert_eq!(report.outcome_of(StepKind::DeployConfigs), Some(&StepOutcome::Exited(0)));
        assert_eq!(report.outcome_of(StepKind::StartDevices), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome_of(StepKind::RunAgent), Some(&StepOutcome::Skipped));
        assert_eq!(report.outcome_of(StepKind::KillRemote), Some(&StepOutcome::Exited(0)));
    }

    #[tokio::test]
    async fn interrupted_agent_still_stops_and_kills_devices() {
        let mut config = RigConfig::default();
        config.deployment.stop_devices = Some("python shutdown.py".to_string());
        let plan = DeploymentPlan::from_config(&config);

        let runner =
            ScriptedRunner::new().on(AGENT, Scripted::Outcome(CommandOutcome::Interrupted));
        let report = Sequencer::default().run(&plan, &runner).await;

        assert_eq!(runner.issued().len(), 7);
        assert_eq!(report.outcome_of(StepKind::RunAgent), Some(&StepOutcome::Interrupted));
        assert_eq!(report.outcome_of(StepKind::StopDevices), Some(&StepOutcome::Exited(0)));
        assert_eq!(report.exit_code(), 0);
    }

    #[tokio::test]
    async fn dry_run_records_plan_and_bank() {
        let config = RigConfig::default();
        let runner = DryRunRunner::new();

        let launch = DeviceBankLauncher::launch(&config.devices, &runner).await;
        let report = Sequencer::default()
            .run(&DeploymentPlan::from_config(&config), &runner)
            .await;

        let issued = runner.issued();
        assert_eq!(launch.requested.len(), 100);
        assert_eq!(issued.len(), 106);
        assert_eq!(
            issued
                .iter()
                .filter(|(invocation, _)| *invocation == Invocation::Detached)
                .count(),
            100
        );
        assert_eq!(report.exit_code(), 0);
    }

    #[tokio::test]
    async fn report_serializes_for_json_output() {
        let runner = ScriptedRunner::new().on(AGENT, exited(4));
        let report = Sequencer::default().run(&plan(), &runner).await;

        let json = serde_json::to_value(&report).unwrap();
        let steps = json["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[4]["kind"], "run_agent");
        assert_eq!(steps[4]["outcome"]["kind"], "exited");
        assert_eq!(steps[4]["outcome"]["value"], 4);
    }
}
