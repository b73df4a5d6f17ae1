// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for device bank launch events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Device bank launch is about to issue its spawns.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use scale_rig::observability::messages::launcher::DeviceBankLaunchStarted;
///
/// let msg = DeviceBankLaunchStarted {
///     simulator: "bacnet.py",
///     first_port: 47808,
///     port_count: 100,
///     runner: "local",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct DeviceBankLaunchStarted<'a> {
    pub simulator: &'a str,
    pub first_port: u16,
    pub port_count: u16,
    /// Name of the command runner issuing the spawns
    pub runner: &'a str,
}

impl Display for DeviceBankLaunchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Launching {} simulated devices from '{}' starting at port {} ({} runner)",
            self.port_count, self.simulator, self.first_port, self.runner
        )
    }
}

impl StructuredLog for DeviceBankLaunchStarted<'_> {
    fn log(&self) {
        tracing::info!(
            simulator = self.simulator,
            first_port = self.first_port,
            port_count = self.port_count,
            runner = self.runner,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "device_bank",
            span_name = name,
            simulator = self.simulator,
            first_port = self.first_port,
            port_count = self.port_count,
            runner = self.runner,
        )
    }
}

/// One simulator spawn was issued.
///
/// # Log Level
/// `debug!` - One line per device; too chatty for info
pub struct DeviceLaunchRequested<'a> {
    pub port: u16,
    pub command_line: &'a str,
}

impl Display for DeviceLaunchRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Spawned simulator on port {}: {}", self.port, self.command_line)
    }
}

impl StructuredLog for DeviceLaunchRequested<'_> {
    fn log(&self) {
        tracing::debug!(port = self.port, command = self.command_line, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("device", span_name = name, port = self.port)
    }
}

/// A simulator could not be spawned at all.
///
/// # Log Level
/// `warn!` - The remaining ports are still launched
pub struct DeviceLaunchFailed<'a> {
    pub port: u16,
    pub error: &'a dyn std::error::Error,
}

impl Display for DeviceLaunchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulator on port {} failed to spawn: {}", self.port, self.error)
    }
}

impl StructuredLog for DeviceLaunchFailed<'_> {
    fn log(&self) {
        tracing::warn!(port = self.port, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("device", span_name = name, port = self.port)
    }
}

/// Every port has had its spawn issued.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DeviceBankLaunchCompleted {
    pub requested: usize,
    pub failed: usize,
    pub duration: std::time::Duration,
}

impl Display for DeviceBankLaunchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Issued {} simulator spawns ({} failed to start) in {:?}",
            self.requested, self.failed, self.duration
        )
    }
}

impl StructuredLog for DeviceBankLaunchCompleted {
    fn log(&self) {
        tracing::info!(
            requested = self.requested,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "device_bank_completed",
            span_name = name,
            requested = self.requested,
            failed = self.failed,
        )
    }
}
