// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::errors::RunnerError;

/// Environment variables whose values are never rendered in logs or plans.
const SECRET_ENV_KEYS: &[&str] = &["SSHPASS"];

/// What happens to a child's stdout and stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Share the caller's terminal.
    #[default]
    Inherit,
    /// stdin, stdout and stderr all go to the null device.
    Discard,
}

/// A fully resolved external command: program, argv, working directory and
/// extra environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub output: OutputMode,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            output: OutputMode::Inherit,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn discard_output(mut self) -> Self {
        self.output = OutputMode::Discard;
        self
    }

    /// Render as a single shell-like line, e.g.
    /// `cd /opt/scripts && SSHPASS=*** sshpass -e ssh host 'pkill python'`.
    ///
    /// Secret environment values are masked. The result is for humans and is
    /// not guaranteed to round-trip through a shell.
    pub fn display_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(dir) = &self.cwd {
            parts.push(format!("cd {} &&", quote(&dir.to_string_lossy())));
        }
        for (key, value) in &self.env {
            if SECRET_ENV_KEYS.contains(&key.as_str()) {
                parts.push(format!("{}=***", key));
            } else {
                parts.push(format!("{}={}", key, quote(value)));
            }
        }
        parts.push(quote(&self.program));
        parts.extend(self.args.iter().map(|a| quote(a)));
        let mut line = parts.join(" ");
        if self.output == OutputMode::Discard {
            line.push_str(" >/dev/null 2>&1");
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

/// Quote one word for a POSIX shell when it needs it.
pub(crate) fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@,+~%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// How a command that actually ran came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Exited on its own with this status code.
    Exited(i32),
    /// Killed by this signal number.
    Signalled(i32),
    /// The operator pressed Ctrl-C while it was running.
    Interrupted,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Exited(0))
    }

    /// Shell-style status code: signal N becomes 128+N, an interrupt 130.
    pub fn code(&self) -> i32 {
        match self {
            CommandOutcome::Exited(code) => *code,
            CommandOutcome::Signalled(signal) => 128 + signal,
            CommandOutcome::Interrupted => 130,
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Start a command and return without waiting for it.
    ///
    /// Only the spawn itself can fail; whatever the child does afterwards is
    /// invisible to the caller.
    async fn spawn_detached(&self, command: &CommandSpec) -> Result<(), RunnerError>;

    /// Run a command to completion.
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutcome, RunnerError>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_quotes_and_masks() {
        let spec = CommandSpec::new("sshpass")
            .args(["-e", "ssh", "volttron@10.0.0.5", "pkill python"])
            .env("SSHPASS", "hunter2")
            .current_dir("/opt/my scripts");

        assert_eq!(
            spec.display_line(),
            "cd '/opt/my scripts' && SSHPASS=*** sshpass -e ssh volttron@10.0.0.5 'pkill python'"
        );
        assert!(!spec.to_string().contains("hunter2"));
    }

    #[test]
    fn display_line_marks_discarded_output() {
        let spec = CommandSpec::new("python").arg("bacnet.py").discard_output();
        assert_eq!(spec.display_line(), "python bacnet.py >/dev/null 2>&1");
    }

    #[test]
    fn empty_and_quoted_words() {
        assert_eq!(quote(""), "''");
        assert_eq!(quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn outcome_codes_follow_shell_conventions() {
        assert_eq!(CommandOutcome::Exited(3).code(), 3);
        assert_eq!(CommandOutcome::Signalled(9).code(), 137);
        assert_eq!(CommandOutcome::Interrupted.code(), 130);
        assert!(CommandOutcome::Exited(0).success());
        assert!(!CommandOutcome::Signalled(15).success());
    }
}
