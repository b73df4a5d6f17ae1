// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::time::Instant;
use tracing::Instrument;

use crate::config::DeviceBankConfig;
use crate::observability::messages::launcher::*;
use crate::observability::messages::StructuredLog;
use crate::traits::{CommandRunner, CommandSpec};

impl DeviceBankConfig {
    /// The simulator invocation for one port:
    /// `<interpreter> <simulator> <config_path> <address> --port <port> <no_daemon_flag>`,
    /// with all output discarded.
    pub fn command_for(&self, port: u16) -> CommandSpec {
        CommandSpec::new(&self.interpreter)
            .args([
                self.simulator.as_str(),
                self.config_path.as_str(),
                self.address.as_str(),
                "--port",
            ])
            .arg(port.to_string())
            .arg(&self.no_daemon_flag)
            .discard_output()
    }
}

/// What the launcher asked for. Only spawn failures are visible here; a
/// simulator that starts and then dies is not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchReport {
    /// Every port a spawn was issued for, in issue order
    pub requested: Vec<u16>,
    /// Ports whose spawn call itself failed, with the error text
    pub failed: Vec<(u16, String)>,
}

impl LaunchReport {
    pub fn spawned(&self) -> usize {
        self.requested.len() - self.failed.len()
    }
}

/// Fire-and-forget launcher for the simulated device bank.
///
/// One detached simulator per port, in ascending port order. The launcher
/// returns as soon as the last spawn is issued: it does not wait for
/// children, check that they bound their port, or look at the config file
/// they were handed.
pub struct DeviceBankLauncher;

impl DeviceBankLauncher {
    pub async fn launch(devices: &DeviceBankConfig, runner: &dyn CommandRunner) -> LaunchReport {
        let start_msg = DeviceBankLaunchStarted {
            simulator: &devices.simulator,
            first_port: devices.ports.start,
            port_count: devices.ports.count,
            runner: runner.name(),
        };
        let span = start_msg.span("device_bank_launch");
        start_msg.log();

        let started = Instant::now();
        let mut report = LaunchReport::default();

        for port in devices.ports.iter() {
            let command = devices.command_for(port);
            report.requested.push(port);
            match runner.spawn_detached(&command).instrument(span.clone()).await {
                Ok(()) => DeviceLaunchRequested {
                    port,
                    command_line: &command.display_line(),
                }
                .log(),
                Err(error) => {
                    DeviceLaunchFailed {
                        port,
                        error: &error,
                    }
                    .log();
                    report.failed.push((port, error.to_string()));
                }
            }
        }

        DeviceBankLaunchCompleted {
            requested: report.requested.len(),
            failed: report.failed.len(),
            duration: started.elapsed(),
        }
        .log();

        report
    }
}
