use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging with human-readable output on stderr.
///
/// Uses the `RUST_LOG` environment variable if set, otherwise falls back
/// to `default_level` (e.g. "info", "debug", "td_tui=debug,warn").
///
/// Safe to call multiple times (e.g. in tests) -- subsequent calls are no-ops.
pub fn init_logging(service_name: &str, default_level: &str) {
    fmt()
        .with_env_filter(filter(default_level))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(io::stderr)
        .try_init()
        .ok();

    tracing::info!(service = service_name, "logging initialised (stderr)");
}

/// Initialize logging into `path`, appending. Parent directories are
/// created. ANSI colouring is off since the output is a file.
///
/// Returns an error only when the file cannot be opened; an already
/// installed subscriber is left in place.
pub fn init_file_logging(service_name: &str, default_level: &str, path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;

    fmt()
        .with_env_filter(filter(default_level))
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok();

    tracing::info!(
        service = service_name,
        path = %path.display(),
        "logging initialised (file)"
    );
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
