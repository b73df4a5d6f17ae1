// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line. The
//! ones that carry useful fields also implement [`StructuredLog`], which
//! emits the event at its documented level with those fields attached, and
//! can open a span around the work it describes.
//!
//! # Organization
//!
//! * `launcher` - device bank spawn events
//! * `sequencer` - deployment step lifecycle events
//! * `validation` - configuration load events and warnings
//!
//! # Usage Pattern
//!
//! ```rust
//! use scale_rig::observability::messages::sequencer::StepStarted;
//! use scale_rig::observability::messages::StructuredLog;
//!
//! let msg = StepStarted {
//!     index: 1,
//!     total: 6,
//!     step: "build_configs",
//!     command_line: "cd ~/volttron/scripts/scalability-testing && fab build_configs",
//! };
//!
//! let span = msg.span("deployment_step");
//! let _guard = span.enter();
//! msg.log();
//! ```

pub mod launcher;
pub mod sequencer;
pub mod validation;

use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// Open a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
