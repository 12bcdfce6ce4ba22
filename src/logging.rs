//! Tracing setup.
//!
//! The terminal UI owns stdout, so it logs to a file; one-shot commands log
//! to stderr. `RUST_LOG` overrides the default filter in both modes.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Overrides the log file used by the terminal UI.
pub const LOG_PATH_ENV: &str = "AUCTION_ADMIN_LOG";

/// `<data dir>/auction-admin/auction-admin.log`, or `$AUCTION_ADMIN_LOG`.
pub fn log_path() -> PathBuf {
    if let Some(path) = std::env::var_os(LOG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("auction-admin")
        .join("auction-admin.log")
}

/// Append logs to [`log_path`]. Logging stays off if the file cannot be opened.
pub fn init_file_tracing() -> Option<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return None;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;
    Some(path)
}

/// Log to stderr. Quiet by default so command output stays clean.
pub fn init_stderr_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(UtcTime::rfc_3339())
        .try_init();
}
