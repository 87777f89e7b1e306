//! File logging.
//!
//! stdout and stderr belong to the terminal UI, so log lines go to
//! `cinelog.log` in the data directory. The filter comes from `CINELOG_LOG`
//! (same syntax as `RUST_LOG`) and defaults to `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "CINELOG_LOG";
pub const LOG_FILE: &str = "cinelog.log";

/// Installs the global subscriber writing to `<dir>/cinelog.log`.
///
/// # Errors
///
/// Returns `Err` if the directory or file cannot be created, or if a global
/// subscriber is already installed.
pub fn init(dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(std::io::Error::other)?;
    Ok(path)
}
