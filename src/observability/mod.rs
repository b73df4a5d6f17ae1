// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types live in [`messages`] and follow a struct-based pattern with a
//! `Display` implementation, so log text is defined once per event instead of
//! being scattered through the launcher and sequencer as format strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::launcher` - device bank spawn events
//! * `messages::sequencer` - deployment step lifecycle events
//! * `messages::validation` - configuration load events and warnings
//!
//! [`init_tracing`] installs the `tracing-subscriber` fmt layer used by the
//! binary.
//!
//! # Usage
//!
//! ```rust
//! use scale_rig::observability::messages::launcher::DeviceLaunchFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//! let msg = DeviceLaunchFailed {
//!     port: 47808,
//!     error: &error,
//! };
//!
//! tracing::warn!("{}", msg);
//! ```

pub mod messages;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count: 0 → info, 1 → debug, 2+ → trace.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `verbosity`. With `log_file` set, output is appended
/// to that file without ANSI colors; otherwise it goes to stderr so stdout
/// stays free for plans and reports.
pub fn init_tracing(verbosity: u8, log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_for_verbosity(verbosity)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // A second install (tests, embedding) keeps the first subscriber.
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "info");
        assert_eq!(level_for_verbosity(1), "debug");
        assert_eq!(level_for_verbosity(2), "trace");
        assert_eq!(level_for_verbosity(9), "trace");
    }
}
