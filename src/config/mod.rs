// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod expand;
mod loader;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use expand::expand_path;
pub use loader::{
    load_and_validate_config, load_config, resolve_config, DeploymentConfig, DeviceBankConfig,
    KillMatch, LocalCommand, PortRange, RemoteConfig, RigConfig,
};
pub use validation::{is_broad_kill_pattern, validate_config};
