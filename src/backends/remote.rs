// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Remote shell sessions against the device host.
//!
//! A session is just a [`CommandSpec`] for the local `ssh` client (wrapped
//! in `sshpass` when a password is configured). Nothing here opens a
//! connection; the runner executes the spec like any other command.

use std::env;
use std::fmt;

use crate::config::{KillMatch, RemoteConfig};
use crate::observability::messages::validation::PasswordEnvMissing;
use crate::traits::runner::quote;
use crate::traits::CommandSpec;

/// Environment variable `sshpass -e` reads the password from.
pub const SSHPASS_ENV: &str = "SSHPASS";

/// Connection parameters for the device host, with the password resolved.
#[derive(Clone, PartialEq)]
pub struct RemoteSession {
    pub host: String,
    pub port: u16,
    pub user: String,
    password: Option<String>,
    pub disable_host_key_check: bool,
    pub connect_timeout_secs: Option<u64>,
}

impl RemoteSession {
    /// Build a session from config, reading `password_env` from the process
    /// environment.
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::from_config_with(config, |name| env::var(name).ok())
    }

    pub(crate) fn from_config_with<F>(config: &RemoteConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let password = match (&config.password, &config.password_env) {
            (Some(literal), _) => Some(literal.clone()),
            (None, Some(variable)) => {
                let value = lookup(variable);
                if value.is_none() {
                    tracing::warn!(
                        "{}",
                        PasswordEnvMissing {
                            variable,
                            host: &config.host,
                        }
                    );
                }
                value
            }
            (None, None) => None,
        };

        Self {
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            password,
            disable_host_key_check: config.disable_host_key_check,
            connect_timeout_secs: config.connect_timeout_secs,
        }
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    pub fn user_at_host(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `ssh` arguments up to and including the destination.
    pub fn ssh_base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.disable_host_key_check {
            args.push("-o".to_string());
            args.push("StrictHostKeyChecking=no".to_string());
            args.push("-o".to_string());
            args.push("UserKnownHostsFile=/dev/null".to_string());
        }
        if let Some(timeout) = self.connect_timeout_secs {
            args.push("-o".to_string());
            args.push(format!("ConnectTimeout={}", timeout));
        }
        args.push("-p".to_string());
        args.push(self.port.to_string());
        args.push(self.user_at_host());
        args
    }

    /// A command spec that runs `remote_command` on the device host.
    ///
    /// The remote command is passed as a single argument so the remote shell
    /// handles globbing, `~`, pipes and redirects. With a password, the
    /// spec runs `sshpass -e ssh ...` and carries the password in the
    /// `SSHPASS` environment variable, keeping it out of argv.
    pub fn command(&self, remote_command: &str) -> CommandSpec {
        let spec = match &self.password {
            Some(password) => CommandSpec::new("sshpass")
                .args(["-e", "ssh"])
                .env(SSHPASS_ENV, password.clone()),
            None => CommandSpec::new("ssh"),
        };
        spec.args(self.ssh_base_args()).arg(remote_command)
    }

    /// The teardown: kill every remote process matching `pattern`, by process
    /// name or, with [`KillMatch::Full`], by full command line.
    pub fn kill_command(&self, pattern: &str, matching: KillMatch) -> CommandSpec {
        let pattern = quote(pattern);
        match matching {
            KillMatch::Name => self.command(&format!("pkill {}", pattern)),
            KillMatch::Full => self.command(&format!("pkill -f {}", pattern)),
        }
    }
}

impl fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSession")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("disable_host_key_check", &self.disable_host_key_check)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
