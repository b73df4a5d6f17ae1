// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and validation warnings.
//!
//! This module contains message types for logging events related to:
//! * Config files being loaded
//! * Risky-but-legal settings (broad kill patterns, disabled host key checks,
//!   literal credentials)
//! * Credentials that could not be resolved at plan time

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A config file was read and parsed.
///
/// # Log Level
/// `debug!`
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub port_count: u16,
    pub host: &'a str,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded config '{}': {} devices, device host '{}'",
            self.path, self.port_count, self.host
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            path = self.path,
            port_count = self.port_count,
            host = self.host,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("config", span_name = name, path = self.path)
    }
}

/// The remote kill pattern will match unrelated processes.
///
/// # Log Level
/// `warn!` - Potential collateral damage on the device host
///
/// # Example
/// ```
/// use scale_rig::observability::messages::validation::BroadKillPattern;
///
/// let msg = BroadKillPattern {
///     pattern: "python",
///     host: "10.0.0.5",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct BroadKillPattern<'a> {
    pub pattern: &'a str,
    pub host: &'a str,
}

impl Display for BroadKillPattern<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Teardown will run 'pkill {}' on '{}', which matches every process with that name, not only the simulators",
            self.pattern, self.host
        )
    }
}

impl StructuredLog for BroadKillPattern<'_> {
    fn log(&self) {
        tracing::warn!(pattern = self.pattern, host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("validation", span_name = name, pattern = self.pattern)
    }
}

/// Remote sessions will not verify the host key.
///
/// # Log Level
/// `debug!` - Expected for throwaway device VMs
pub struct HostKeyCheckDisabled<'a> {
    pub host: &'a str,
}

impl Display for HostKeyCheckDisabled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Host key checking is disabled for '{}'", self.host)
    }
}

impl StructuredLog for HostKeyCheckDisabled<'_> {
    fn log(&self) {
        tracing::debug!(host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("validation", span_name = name, host = self.host)
    }
}

/// The config file carries a plaintext password.
///
/// # Log Level
/// `warn!`
pub struct LiteralPasswordInConfig<'a> {
    pub host: &'a str,
}

impl Display for LiteralPasswordInConfig<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Config holds a literal password for '{}'; consider 'password_env' instead",
            self.host
        )
    }
}

impl StructuredLog for LiteralPasswordInConfig<'_> {
    fn log(&self) {
        tracing::warn!(host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("validation", span_name = name, host = self.host)
    }
}

/// `password_env` names a variable that is not set.
///
/// # Log Level
/// `warn!` - ssh falls back to key authentication (or prompts)
pub struct PasswordEnvMissing<'a> {
    pub variable: &'a str,
    pub host: &'a str,
}

impl Display for PasswordEnvMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Environment variable '{}' is not set; connecting to '{}' without a password",
            self.variable, self.host
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broad_kill_pattern_message() {
        let msg = BroadKillPattern {
            pattern: "python",
            host: "10.0.0.5",
        };
        assert!(msg.to_string().starts_with("Teardown will run 'pkill python' on '10.0.0.5'"));
    }

    #[test]
    fn password_env_missing_message() {
        let msg = PasswordEnvMissing {
            variable: "DEVICE_PW",
            host: "vm",
        };
        assert_eq!(
            msg.to_string(),
            "Environment variable 'DEVICE_PW' is not set; connecting to 'vm' without a password"
        );
    }
}
