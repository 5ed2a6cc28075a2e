//! Tracing setup for the server and the CLI.
//!
//! The server writes compact lines to stdout and mirrors them into a log file through a
//! non-blocking appender. `PDFBRIEF_LOG_FILE` picks the file; without it logs land in
//! `logs/pdfbrief.log`. The CLI only logs to stderr because stdout carries its JSON output.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable overriding the log file location.
pub const LOG_FILE_VAR: &str = "PDFBRIEF_LOG_FILE";

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_NAME: &str = "pdfbrief.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the server subscriber: `RUST_LOG` filter (default `info`), stdout, and a log file.
///
/// File logging is skipped with a message on stderr when the file cannot be prepared.
pub fn init_tracing() {
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = file_writer(&log_file_path(std::env::var(LOG_FILE_VAR).ok())).map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Stderr-only subscriber for the CLI, defaulting to `warn`.
pub fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Resolve the log file, treating a blank override as unset.
fn log_file_path(override_path: Option<String>) -> PathBuf {
    match override_path {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => Path::new(DEFAULT_LOG_DIR).join(DEFAULT_LOG_NAME),
    }
}

fn file_writer(path: &Path) -> Option<NonBlocking> {
    let Some(name) = path.file_name() else {
        eprintln!("Log path {} has no file name", path.display());
        return None;
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {err}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_defaults_under_logs_dir() {
        assert_eq!(log_file_path(None), PathBuf::from("logs/pdfbrief.log"));
        assert_eq!(
            log_file_path(Some("   ".into())),
            PathBuf::from("logs/pdfbrief.log")
        );
    }

    #[test]
    fn log_path_honors_override() {
        assert_eq!(
            log_file_path(Some(" /var/log/pdfbrief/server.log ".into())),
            PathBuf::from("/var/log/pdfbrief/server.log")
        );
    }
}
