// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // command runners + remote sessions
pub mod cli;        // argv parsing
pub mod config;     // config loading + validation
pub mod engine;     // device bank launcher and deployment sequencer
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // unified abstractions
