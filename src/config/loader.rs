// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::*;
use crate::config::expand::expand_path;
use crate::errors::{ConfigError, FailureStrategy};
use crate::observability::messages::{validation::ConfigLoaded, StructuredLog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for a scalability test rig.
///
/// Everything the device-bank launcher and deployment sequencer need is
/// held here: where the simulator lives, which ports it takes, how to reach
/// the device host, and which local tasks make up a deployment. Every
/// section is optional; missing values fall back to the stock
/// `~/volttron` layout.
///
/// # Example
/// ```yaml
/// failure_strategy: continue_on_error
/// devices:
///   simulator: ~/volttron/scripts/scalability-testing/virtual-drivers/bacnet.py
///   ports:
///     start: 47808
///     count: 100
/// remote:
///   host: 192.168.56.20
///   user: volttron
///   password_env: DEVICE_VM_PASSWORD
/// deployment:
///   agent:
///     program: python
///     args: ["-m", "master_driver.agent"]
///     cwd: ~/volttron/services/core/MasterDriverAgent
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RigConfig {
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    #[serde(default)]
    pub devices: DeviceBankConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

/// The bank of simulated devices started on one host, one per port.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceBankConfig {
    /// Interpreter that runs the simulator script
    pub interpreter: String,
    /// Simulator script handed to the interpreter
    pub simulator: String,
    /// Device configuration file passed through to every simulator, never read here
    pub config_path: String,
    /// Address the simulators bind to
    pub address: String,
    pub ports: PortRange,
    pub no_daemon_flag: String,
}

impl Default for DeviceBankConfig {
    fn default() -> Self {
        let scripts = format!("{}/scripts/scalability-testing", DEFAULT_INSTALL_ROOT);
        Self {
            interpreter: format!("{}/env/bin/python", DEFAULT_INSTALL_ROOT),
            simulator: format!("{}/virtual-drivers/bacnet.py", scripts),
            config_path: format!("{}/device-configs/bacnet.csv", scripts),
            address: DEFAULT_DEVICE_ADDRESS.to_string(),
            ports: PortRange::default(),
            no_daemon_flag: DEFAULT_NO_DAEMON_FLAG.to_string(),
        }
    }
}

/// A contiguous block of ports, `start..start + count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PortRange {
    pub start: u16,
    pub count: u16,
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_PORT_START,
            count: DEFAULT_PORT_COUNT,
        }
    }
}

impl PortRange {
    /// One past the last port, widened so an overflowing range can be reported.
    pub fn end(&self) -> u32 {
        self.start as u32 + self.count as u32
    }

    pub fn fits(&self) -> bool {
        self.end() <= u16::MAX as u32 + 1
    }

    /// Ascending ports of the range; anything past 65535 is dropped.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        (self.start as u32..self.end()).filter_map(|p| u16::try_from(p).ok())
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The remote device host, reached over password or key authenticated SSH.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Literal password. Prefer `password_env`. Serialized as `***`.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "mask_secret"
    )]
    pub password: Option<String>,
    /// Name of an environment variable holding the password
    pub password_env: Option<String>,
    pub disable_host_key_check: bool,
    pub connect_timeout_secs: Option<u64>,
}

const MASKED_SECRET: &str = "***";

fn mask_secret<S: serde::Serializer>(
    _secret: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(MASKED_SECRET)
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_SSH_PORT,
            user: DEFAULT_SSH_USER.to_string(),
            password: None,
            password_env: None,
            disable_host_key_check: true,
            connect_timeout_secs: Some(DEFAULT_SSH_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// A local command template: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocalCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

impl LocalCommand {
    pub fn new(program: &str, args: &[&str], cwd: &str) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: Some(cwd.to_string()),
        }
    }
}

/// The ordered pieces of a deployment run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Generate device and driver configs
    pub build_configs: LocalCommand,
    /// Install the generated driver configs into the driver agent
    pub install_configs: LocalCommand,
    /// Copy device configs to the remote host
    pub deploy_configs: LocalCommand,
    /// Command run on the remote host to start its device bank
    pub start_devices: String,
    /// Driver agent; blocks the sequence until it exits
    pub agent: LocalCommand,
    /// Optional targeted shutdown run remotely after the agent exits
    pub stop_devices: Option<String>,
    /// Pattern matched by the final remote `pkill`. Defaults to the file
    /// name of `devices.interpreter`.
    pub kill_pattern: Option<String>,
    /// What `kill_pattern` is matched against on the remote host
    pub kill_match: KillMatch,
}

/// How the remote `pkill` matches `kill_pattern`.
///
/// # Variants
/// * `Name` - The process name only, at most 15 characters (`pkill`, default)
/// * `Full` - The full command line (`pkill -f`); needed to target a script
///   such as `bacnet.py`, whose process name is its interpreter's
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KillMatch {
    #[default]
    Name,
    Full,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        let scripts = format!("{}/scripts/scalability-testing", DEFAULT_INSTALL_ROOT);
        Self {
            build_configs: LocalCommand::new("fab", &["build_configs"], &scripts),
            install_configs: LocalCommand::new(
                "python",
                &["install_master_driver_configs.py", "scalability-testing/configs"],
                &format!("{}/scripts", DEFAULT_INSTALL_ROOT),
            ),
            deploy_configs: LocalCommand::new("fab", &["deploy_device_configs"], &scripts),
            start_devices: format!("{}/virtual-drivers/launch_bacnet.sh", scripts),
            agent: LocalCommand::new(
                "python",
                &["-m", "master_driver.agent"],
                &format!("{}/services/core/MasterDriverAgent", DEFAULT_INSTALL_ROOT),
            ),
            stop_devices: None,
            kill_pattern: None,
            kill_match: KillMatch::Name,
        }
    }
}

impl RigConfig {
    /// Expand `~` and `$VAR` in every locally interpreted path.
    ///
    /// Remote commands are left untouched; the remote shell expands them
    /// against its own environment.
    pub fn expand_paths(&mut self) {
        let devices = &mut self.devices;
        devices.interpreter = expand_path(&devices.interpreter);
        devices.simulator = expand_path(&devices.simulator);
        devices.config_path = expand_path(&devices.config_path);

        let deployment = &mut self.deployment;
        for command in [
            &mut deployment.build_configs,
            &mut deployment.install_configs,
            &mut deployment.deploy_configs,
            &mut deployment.agent,
        ] {
            command.program = expand_path(&command.program);
            if let Some(cwd) = command.cwd.as_mut() {
                *cwd = expand_path(cwd);
            }
        }
    }

    /// Pattern used by the final remote kill.
    pub fn kill_pattern(&self) -> String {
        match &self.deployment.kill_pattern {
            Some(pattern) => pattern.clone(),
            None => Path::new(&self.devices.interpreter)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.devices.interpreter.clone()),
        }
    }
}

/// Load a config from a YAML file, or TOML when the extension is `.toml`.
///
/// Paths are expanded but nothing is validated.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RigConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut cfg: RigConfig = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    cfg.expand_paths();

    ConfigLoaded {
        path: &path.display().to_string(),
        port_count: cfg.devices.ports.count,
        host: &cfg.remote.host,
    }
    .log();

    Ok(cfg)
}

/// Load and validate a config file.
///
/// Validation warnings are logged; only hard errors fail the load.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<RigConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

/// Resolve the config to use: an explicit path, else `scale-rig.yaml` in the
/// working directory, else built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<RigConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_and_validate_config(path);
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        return load_and_validate_config(fallback);
    }
    let mut cfg = RigConfig::default();
    cfg.expand_paths();
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
