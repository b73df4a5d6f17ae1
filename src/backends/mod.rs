// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Command runner backends and remote session construction.
//!
//! Every external program the rig touches goes through a
//! [`CommandRunner`](crate::traits::CommandRunner). The launcher and
//! sequencer only build [`CommandSpec`](crate::traits::CommandSpec)s; which
//! backend executes them is the caller's choice.
//!
//! # Available Backends
//!
//! ## Local Backend
//! Real child processes via `tokio::process`:
//! - **Detached spawns**: handle dropped immediately, child left running
//! - **Blocking runs**: exit code or signal reported as a `CommandOutcome`
//! - **Interrupts**: an [`interrupt::Interrupt`] firing during a run gives the
//!   child a grace period to exit, then kills it, and reports `Interrupted`
//!
//! ## Dry-Run Backend
//! Records commands without running them; backs `scale-rig plan`.
//!
//! ## Scripted Backend (Test-Only)
//! Records commands and answers from scripted rules so tests can force exit
//! codes and spawn failures at chosen steps. Not available in production
//! builds.
//!
//! ## Remote Sessions
//! [`remote::RemoteSession`] turns the configured device host into `ssh`
//! (or `sshpass -e ssh`) command specs.
//!
//! # Examples
//!
//! ```rust
//! use scale_rig::backends::remote::RemoteSession;
//! use scale_rig::config::{KillMatch, RemoteConfig};
//!
//! let session = RemoteSession::from_config(&RemoteConfig::default());
//! let spec = session.kill_command("python", KillMatch::Name);
//!
//! assert_eq!(spec.program, "ssh");
//! assert_eq!(spec.args.last().unwrap(), "pkill python");
//! ```

pub mod dry_run;
pub mod interrupt;
pub mod local;
pub mod remote;
#[cfg(test)]
pub mod stub;

pub use dry_run::{DryRunRunner, Invocation};
pub use interrupt::{Interrupt, InterruptHandle};
pub use local::LocalRunner;
pub use remote::RemoteSession;
