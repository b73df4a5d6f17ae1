// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use std::env;
use std::process;

use scale_rig::backends::{DryRunRunner, Interrupt, Invocation, LocalRunner};
use scale_rig::cli::{parse_args, Cli, Command, USAGE};
use scale_rig::config::{resolve_config, RigConfig};
use scale_rig::engine::{DeploymentPlan, DeviceBankLauncher, Sequencer};
use scale_rig::errors::FailureStrategy;
use scale_rig::observability::init_tracing;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            process::exit(2);
        }
    };

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("❌ {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    if cli.command == Some(Command::Help) {
        println!("{}", USAGE);
        return Ok(0);
    }

    init_tracing(cli.verbosity, cli.log_file.as_deref())
        .with_context(|| format!("opening log file {:?}", cli.log_file))?;

    let config = resolve_config(cli.config.as_deref()).context("loading rig configuration")?;

    if cli.show_config {
        print!(
            "{}",
            serde_yaml::to_string(&config).context("rendering configuration")?
        );
        return Ok(0);
    }

    match cli.command {
        Some(Command::LaunchDevices) => launch_devices(&config).await,
        Some(Command::Deploy { fail_fast, json }) => deploy(&config, fail_fast, json).await,
        Some(Command::Plan) => plan(&config).await,
        Some(Command::Help) | None => Ok(0),
    }
}

async fn launch_devices(config: &RigConfig) -> Result<i32> {
    let report = DeviceBankLauncher::launch(&config.devices, &LocalRunner::new()).await;
    for (port, error) in &report.failed {
        eprintln!("port {}: {}", port, error);
    }
    println!(
        "Requested {} devices ({} spawned)",
        report.requested.len(),
        report.spawned()
    );
    // Spawn failures are reported but do not change the status.
    Ok(0)
}

async fn deploy(config: &RigConfig, fail_fast: bool, json: bool) -> Result<i32> {
    let strategy = if fail_fast {
        FailureStrategy::FailFast
    } else {
        config.failure_strategy
    };
    let plan = DeploymentPlan::from_config(config);
    let interrupt = Interrupt::ctrl_c();
    let runner = LocalRunner::new().with_interrupt(interrupt.clone());
    let report = Sequencer::new(strategy)
        .with_interrupt(interrupt)
        .run(&plan, &runner)
        .await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing sequence report")?
        );
    } else {
        for step in &report.steps {
            println!("{:<16} {}", step.kind.name(), step.outcome);
        }
    }
    Ok(report.exit_code())
}

async fn plan(config: &RigConfig) -> Result<i32> {
    let runner = DryRunRunner::new();
    DeviceBankLauncher::launch(&config.devices, &runner).await;
    Sequencer::default()
        .run(&DeploymentPlan::from_config(config), &runner)
        .await;

    let issued = runner.issued();
    let (bank, steps): (Vec<_>, Vec<_>) = issued
        .iter()
        .partition(|(invocation, _)| *invocation == Invocation::Detached);

    println!("# launch-devices ({} detached)", bank.len());
    for (_, command) in bank {
        println!("{} &", command);
    }
    println!("\n# deploy");
    for (_, command) in steps {
        println!("{}", command);
    }
    Ok(0)
}
