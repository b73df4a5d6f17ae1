// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for a rig config.
//!
//! Hard errors are collected rather than short-circuited, so one run reports
//! every problem in the file. Softer concerns, such as a kill pattern broad
//! enough to hit unrelated processes, are logged as warnings and never fail
//! the load.
//!
//! # Checks
//!
//! 1. **Port range**: non-empty and within `0..=65535`
//! 2. **Required fields**: interpreter, simulator, host, user, agent program,
//!    remote start command and kill pattern are non-empty
//! 3. **Credentials**: at most one of `password` / `password_env`
//! 4. **Kill pattern**: a name-matched pattern must fit a process name
//!
//! # Example
//! ```rust
//! use scale_rig::config::{validate_config, RigConfig};
//! use scale_rig::errors::ValidationError;
//!
//! let mut config = RigConfig::default();
//! config.devices.ports.count = 0;
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(errors, vec![ValidationError::EmptyPortRange]);
//! ```

use crate::config::{KillMatch, RigConfig};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    BroadKillPattern, HostKeyCheckDisabled, LiteralPasswordInConfig,
};
use crate::observability::messages::StructuredLog;

/// Interpreter names that match far more than the simulators on a typical host.
const BROAD_KILL_PATTERNS: &[&str] = &["python", "python2", "python3", "sh", "bash", "java", "node"];

/// Validate a configuration, returning every hard error found.
///
/// Warnings are emitted through `tracing` as a side effect.
pub fn validate_config(config: &RigConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_ports(config, &mut errors);
    validate_required_fields(config, &mut errors);
    validate_credentials(config, &mut errors);
    validate_kill_pattern(config, &mut errors);

    emit_warnings(config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_ports(config: &RigConfig, errors: &mut Vec<ValidationError>) {
    let ports = config.devices.ports;
    if ports.is_empty() {
        errors.push(ValidationError::EmptyPortRange);
    } else if !ports.fits() {
        errors.push(ValidationError::PortRangeOverflow {
            start: ports.start,
            count: ports.count,
        });
    }
}

fn validate_required_fields(config: &RigConfig, errors: &mut Vec<ValidationError>) {
    let kill_pattern = config.kill_pattern();
    let required = [
        ("devices.interpreter", config.devices.interpreter.as_str()),
        ("devices.simulator", config.devices.simulator.as_str()),
        ("remote.host", config.remote.host.as_str()),
        ("remote.user", config.remote.user.as_str()),
        ("deployment.agent.program", config.deployment.agent.program.as_str()),
        ("deployment.start_devices", config.deployment.start_devices.as_str()),
        ("deployment.kill_pattern", kill_pattern.as_str()),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyField {
                field: field.to_string(),
            });
        }
    }
}

fn validate_credentials(config: &RigConfig, errors: &mut Vec<ValidationError>) {
    let remote = &config.remote;
    if remote.password.is_some() && remote.password_env.is_some() {
        errors.push(ValidationError::ConflictingCredentials {
            host: remote.host.clone(),
        });
    }
}

/// Longest process name the remote kernel reports (`TASK_COMM_LEN - 1`).
const MAX_PROCESS_NAME_LEN: usize = 15;

fn validate_kill_pattern(config: &RigConfig, errors: &mut Vec<ValidationError>) {
    if config.deployment.kill_match != KillMatch::Name {
        return;
    }
    let pattern = config.kill_pattern();
    if !pattern.is_empty() && !is_process_name(&pattern) {
        errors.push(ValidationError::KillPatternNotAProcessName { pattern });
    }
}

/// Whether `pattern` could equal a process name as `pkill` sees it.
fn is_process_name(pattern: &str) -> bool {
    pattern.len() <= MAX_PROCESS_NAME_LEN
        && !pattern.contains('/')
        && !pattern.chars().any(char::is_whitespace)
}

fn emit_warnings(config: &RigConfig) {
    let pattern = config.kill_pattern();
    if is_broad_kill_pattern(&pattern) {
        BroadKillPattern {
            pattern: &pattern,
            host: &config.remote.host,
        }
        .log();
    }
    if config.remote.disable_host_key_check {
        HostKeyCheckDisabled {
            host: &config.remote.host,
        }
        .log();
    }
    if config.remote.password.is_some() {
        LiteralPasswordInConfig {
            host: &config.remote.host,
        }
        .log();
    }
}

/// Whether a `pkill` pattern is a bare interpreter or shell name.
pub fn is_broad_kill_pattern(pattern: &str) -> bool {
    BROAD_KILL_PATTERNS.contains(&pattern.trim())
}
