// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// First port of the simulated device bank (BACnet/IP default port)
pub const DEFAULT_PORT_START: u16 = 47808;
/// Number of simulated devices in the bank
pub const DEFAULT_PORT_COUNT: u16 = 100;
/// Address every simulator binds to
pub const DEFAULT_DEVICE_ADDRESS: &str = "0.0.0.0";
/// Flag that keeps a simulator in the foreground
pub const DEFAULT_NO_DAEMON_FLAG: &str = "--no-daemon";

/// Install root shared by the local and remote hosts
pub const DEFAULT_INSTALL_ROOT: &str = "~/volttron";

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_SSH_USER: &str = "volttron";
pub const DEFAULT_SSH_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Config file picked up from the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE: &str = "scale-rig.yaml";
