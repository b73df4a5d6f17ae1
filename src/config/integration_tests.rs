// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use crate::config::{is_broad_kill_pattern, load_and_validate_config, resolve_config, KillMatch};
    use crate::engine::{DeploymentPlan, StepKind};
    use crate::errors::FailureStrategy;

    /// The shipped rig config loads, validates and expands local paths
    #[test]
    fn test_scale_rig_yaml_loading() {
        let config = load_and_validate_config("configs/scale-rig.yaml").unwrap();

        assert_eq!(config.failure_strategy, FailureStrategy::ContinueOnError);
        assert_eq!(config.devices.ports.start, 47808);
        assert_eq!(config.devices.ports.count, 100);
        assert_eq!(config.devices.no_daemon_flag, "--no-daemon");
        assert_eq!(config.remote.host, "192.168.1.50");
        assert_eq!(config.remote.password, None);
        assert_eq!(config.remote.password_env.as_deref(), Some("SCALE_RIG_SSH_PASSWORD"));

        if std::env::var_os("HOME").is_some() {
            assert!(!config.devices.interpreter.starts_with('~'));
        }
        assert!(config.devices.interpreter.ends_with("/volttron/env/bin/python"));

        // Remote commands keep `~` for the remote shell.
        assert!(config.deployment.start_devices.starts_with("~/"));
        assert!(!is_broad_kill_pattern(&config.kill_pattern()));
    }

    /// The shipped rig config plans all seven steps
    #[test]
    fn test_scale_rig_yaml_plan() {
        let config = load_and_validate_config("configs/scale-rig.yaml").unwrap();
        let plan = DeploymentPlan::from_config(&config);

        assert_eq!(plan.len(), 7);
        assert_eq!(plan.kinds()[5], StepKind::StopDevices);
        let kill = &plan.steps[6].command;
        assert_eq!(config.deployment.kill_match, KillMatch::Full);
        assert_eq!(kill.args.last().unwrap(), "pkill -f bacnet.py");
    }

    /// TOML configs fill omitted sections from defaults
    #[test]
    fn test_fail_fast_toml_loading() {
        let config = load_and_validate_config("configs/fail-fast.toml").unwrap();

        assert_eq!(config.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(config.devices.ports.start, 50000);
        assert_eq!(config.devices.ports.count, 10);
        assert_eq!(config.devices.address, "0.0.0.0");
        assert_eq!(config.remote.port, 22);
        assert!(!config.remote.disable_host_key_check);
        assert_eq!(config.deployment.build_configs.program, "fab");
        assert_eq!(config.kill_pattern(), "python3");
    }

    /// An explicit path that does not exist is an error, not a silent default
    #[test]
    fn test_resolve_explicit_missing_path() {
        let missing = std::path::Path::new("configs/does-not-exist.yaml");
        assert!(resolve_config(Some(missing)).is_err());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let path = std::path::Path::new("configs/fail-fast.toml");
        let config = resolve_config(Some(path)).unwrap();
        assert_eq!(config.remote.host, "devices.lab");
    }
}
