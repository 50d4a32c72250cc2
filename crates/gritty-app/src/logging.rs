//! File logging. Stdout belongs to the terminal widget, so the client never
//! logs to it.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gritty_common::{GrittyError, Result};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Directory holding the log file: `<data dir>/gritty`.
pub fn log_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("gritty"))
        .ok_or_else(|| GrittyError::Other("could not determine data directory".into()))
}

/// Resolve the configured log file name against the log directory. Absolute
/// paths are used as given.
pub fn log_path(dir: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    }
}

/// Parse `directive`, falling back to `fallback` when it is malformed.
pub fn env_filter(directive: &str, fallback: &str) -> EnvFilter {
    let directive: Directive = directive
        .parse()
        .or_else(|_| fallback.parse())
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    EnvFilter::from_default_env().add_directive(directive)
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber writing to `file`. Returns the log path.
pub fn init(directive: &str, file: &str) -> Result<PathBuf> {
    let path = log_path(&log_dir()?, file);
    let log = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive, "gritty=info"))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    Ok(path)
}
