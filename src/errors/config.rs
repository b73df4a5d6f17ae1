// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors found while validating a loaded rig configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The device bank would launch zero simulators
    EmptyPortRange,
    /// The port range runs past the last valid port
    PortRangeOverflow {
        start: u16,
        count: u16,
    },
    /// A required string field is empty
    EmptyField {
        /// Dotted path of the offending field, e.g. `remote.host`
        field: String,
    },
    /// Both a literal password and a password environment variable were given
    ConflictingCredentials {
        host: String,
    },
    /// A name-matched kill pattern that no process name can match
    KillPatternNotAProcessName {
        pattern: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPortRange => {
                write!(f, "Device port range is empty: 'devices.ports.count' must be at least 1")
            }
            ValidationError::PortRangeOverflow { start, count } => {
                write!(
                    f,
                    "Device port range {}..{} exceeds the highest valid port 65535",
                    start,
                    *start as u32 + *count as u32
                )
            }
            ValidationError::EmptyField { field } => {
                write!(f, "Required field '{}' is empty", field)
            }
            ValidationError::ConflictingCredentials { host } => {
                write!(
                    f,
                    "Remote host '{}' sets both 'password' and 'password_env'; pick one",
                    host
                )
            }
            ValidationError::KillPatternNotAProcessName { pattern } => {
                write!(
                    f,
                    "Kill pattern '{}' can never match a process name (at most 15 characters, \
                     no spaces or '/'); set 'deployment.kill_match: full' to match command lines",
                    pattern
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for the config schema.
    #[error("Invalid YAML in '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The file is not valid TOML for the config schema.
    #[error("Invalid TOML in '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The file parsed but failed validation.
    #[error("Configuration validation failed:\n{}", render_all(.0))]
    Invalid(Vec<ValidationError>),
}

fn render_all(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_message_names_the_end_port() {
        let err = ValidationError::PortRangeOverflow {
            start: 65500,
            count: 100,
        };
        assert_eq!(
            err.to_string(),
            "Device port range 65500..65600 exceeds the highest valid port 65535"
        );
    }

    #[test]
    fn invalid_config_lists_every_error() {
        let err = ConfigError::Invalid(vec![
            ValidationError::EmptyPortRange,
            ValidationError::EmptyField {
                field: "remote.host".to_string(),
            },
        ]);
        let message = err.to_string();
        assert!(message.starts_with("Configuration validation failed:"));
        assert!(message.contains("  - Device port range is empty"));
        assert!(message.contains("  - Required field 'remote.host' is empty"));
    }
}
