// ABOUTME: Production logging setup using tracing with env-filter support
// ABOUTME: Initializes structured log output for the assist server process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Logging initialization
//!
//! Log verbosity is controlled with `RUST_LOG` (default `info`). Output is
//! line-oriented structured text suitable for container log collection.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Safe to call once per process; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
