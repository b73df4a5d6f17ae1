// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Argument parsing for the `scale-rig` binary.

use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: scale-rig [GLOBAL FLAGS] <command> [FLAGS]

Commands:
  launch-devices [-c CONFIG]                   start one simulated device per port and return
  deploy [-c CONFIG] [--fail-fast] [--json]    run the deployment sequence
  plan [-c CONFIG]                             print the commands a run would issue
  help                                         show this message

Global flags:
  --show-config     print the resolved configuration and exit
  -v, -vv           raise log verbosity (RUST_LOG overrides)
  --log FILE        write logs to FILE instead of stderr";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LaunchDevices,
    Deploy { fail_fast: bool, json: bool },
    Plan,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cli {
    /// `None` only when `--show-config` was given on its own
    pub command: Option<Command>,
    pub config: Option<PathBuf>,
    pub show_config: bool,
    pub verbosity: u8,
    pub log_file: Option<PathBuf>,
}

/// Parse arguments WITHOUT the program name.
///
/// Global flags may appear before or after the subcommand.
pub fn parse_args(args: &[&str]) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut fail_fast = false;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "-c" | "--config" => {
                i += 1;
                cli.config = Some(PathBuf::from(take_arg(args, i, "--config")?));
            }
            "--log" => {
                i += 1;
                cli.log_file = Some(PathBuf::from(take_arg(args, i, "--log")?));
            }
            "--show-config" => cli.show_config = true,
            "--fail-fast" => fail_fast = true,
            "--json" => json = true,
            "-h" | "--help" => cli.command = Some(Command::Help),
            flag if is_verbosity(flag) => {
                cli.verbosity = cli.verbosity.saturating_add((flag.len() - 1) as u8);
            }
            "--verbose" => cli.verbosity = cli.verbosity.saturating_add(1),
            flag if flag.starts_with('-') => return Err(format!("Unknown flag: '{}'", flag)),
            word => {
                if cli.command.is_some() {
                    return Err(format!("Unexpected argument: '{}'", word));
                }
                cli.command = Some(parse_command(word)?);
            }
        }
        i += 1;
    }

    match &mut cli.command {
        Some(Command::Deploy {
            fail_fast: ff,
            json: js,
        }) => {
            *ff = fail_fast;
            *js = json;
        }
        Some(Command::Help) => {}
        _ if fail_fast => return Err("--fail-fast is only valid with 'deploy'".into()),
        _ if json => return Err("--json is only valid with 'deploy'".into()),
        Some(_) => {}
        None if cli.show_config => {}
        None => return Err("No command specified. Run 'scale-rig help' for usage.".into()),
    }

    Ok(cli)
}

fn parse_command(word: &str) -> Result<Command, String> {
    match word {
        "launch-devices" => Ok(Command::LaunchDevices),
        "deploy" => Ok(Command::Deploy {
            fail_fast: false,
            json: false,
        }),
        "plan" => Ok(Command::Plan),
        "help" => Ok(Command::Help),
        _ => Err(format!("Unknown command: '{}'", word)),
    }
}

fn is_verbosity(flag: &str) -> bool {
    flag.len() > 1 && flag.starts_with('-') && flag[1..].chars().all(|c| c == 'v')
}

fn take_arg(args: &[&str], i: usize, flag: &str) -> Result<String, String> {
    args.get(i)
        .map(|value| value.to_string())
        .ok_or_else(|| format!("{} requires a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_devices_with_config() {
        let cli = parse_args(&["launch-devices", "-c", "rig.yaml"]).unwrap();
        assert_eq!(cli.command, Some(Command::LaunchDevices));
        assert_eq!(cli.config, Some(PathBuf::from("rig.yaml")));
    }

    #[test]
    fn deploy_flags() {
        let cli = parse_args(&["deploy", "--fail-fast", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Deploy {
                fail_fast: true,
                json: true
            })
        );

        let cli = parse_args(&["deploy"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Deploy {
                fail_fast: false,
                json: false
            })
        );
    }

    #[test]
    fn global_flags_anywhere() {
        let cli = parse_args(&["-vv", "plan", "--log", "/tmp/rig.log", "-v"]).unwrap();
        assert_eq!(cli.command, Some(Command::Plan));
        assert_eq!(cli.verbosity, 3);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/rig.log")));
    }

    #[test]
    fn show_config_alone_is_enough() {
        let cli = parse_args(&["--show-config", "--config", "rig.toml"]).unwrap();
        assert!(cli.show_config);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn errors() {
        assert!(parse_args(&[]).unwrap_err().contains("No command"));
        assert!(parse_args(&["frobnicate"]).unwrap_err().contains("Unknown command"));
        assert!(parse_args(&["plan", "--bogus"]).unwrap_err().contains("Unknown flag"));
        assert!(parse_args(&["deploy", "-c"]).unwrap_err().contains("requires a value"));
        assert!(parse_args(&["plan", "--fail-fast"]).is_err());
        assert!(parse_args(&["launch-devices", "--json"]).is_err());
        assert!(parse_args(&["plan", "deploy"]).unwrap_err().contains("Unexpected"));
    }
}
