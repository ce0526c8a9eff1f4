//! Logging wiring for the binaries.
//!
//! Library crates only emit `tracing` events. This module installs the one
//! subscriber for the process: timestamped human-readable lines on stdout and,
//! when a path is given, the same lines without colour codes appended to the
//! log file. The level defaults to `info` and can be overridden with `RUST_LOG`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, registry, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// If the log file cannot be opened, logging continues on stdout only and a
/// warning is printed to stderr.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
            Err(e) => {
                eprintln!(
                    "Warning: could not open log file {}: {e}. Logging to stdout only.",
                    path.display()
                );
                None
            }
        }
    });

    registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .with(file_layer)
        .try_init()
        .context("failed to install the tracing subscriber")
}
