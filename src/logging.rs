//! Tracing subscriber setup.
//!
//! Stdout carries the HTTP response, so logs go to the configured log file
//! or to stderr. The level comes from `RUST_LOG` and defaults to `info`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

/// Install the global subscriber. Falls back to stderr when the log file
/// cannot be opened; calling this twice is a no-op.
pub fn init(logfile: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    let file = logfile.map(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| (path, err))
    });

    let installed = match file {
        Some(Ok(file)) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        Some(Err((path, err))) => {
            eprintln!("nlist: cannot open logfile {}: {err}", path.display());
            builder.with_ansi(false).with_writer(io::stderr).try_init()
        }
        None => builder.with_ansi(false).with_writer(io::stderr).try_init(),
    };
    // Err only means a subscriber is already installed.
    let _ = installed;
}
